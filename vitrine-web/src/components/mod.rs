pub mod cart_popup;
pub mod catalog;
pub mod checkout_popup;
pub mod header;
pub mod notice;
pub mod password_field;
pub mod pix_qr;
pub mod popup;
