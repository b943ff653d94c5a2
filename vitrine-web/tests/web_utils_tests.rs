#[cfg(target_arch = "wasm32")]
use vitrine_core::{CartStore, KeyValueStore, ProductSnapshot};
#[cfg(target_arch = "wasm32")]
use vitrine_web::{dom, storage::BrowserStorage};
use vitrine_web::app::handlers::{add_notice, login_route};
use vitrine_web::router::Route;

#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[test]
fn shared_config_uses_embedded_defaults() {
    let config = vitrine_web::config::shared();
    assert_eq!(config.products_url(), "https://localhost:7223/api/Produto");
    assert!(!config.checkout.retain_failed_lines);
}

#[test]
fn configured_login_path_is_an_app_route() {
    let config = vitrine_web::config::shared();
    assert_eq!(login_route(&config.login_path), Some(Route::Login));
}

#[test]
fn add_notice_reports_new_quantity() {
    assert!(add_notice("Widget", vitrine_core::AddOutcome::QuantityUpdated(4)).contains('4'));
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen_test::wasm_bindgen_test]
fn browser_storage_round_trips_cart() {
    let storage = BrowserStorage;
    storage.remove_item("vitrine.test.cart").expect("remove");
    let store = CartStore::with_key(storage, "vitrine.test.cart");
    store.add_or_increment(&ProductSnapshot::new(
        "A",
        "Widget",
        "9.99".parse().expect("decimal"),
    ));
    let raw = storage
        .get_item("vitrine.test.cart")
        .expect("read")
        .expect("cart persisted");
    assert!(raw.contains("\"unitPrice\""));
    assert_eq!(store.load().len(), 1);
    storage.remove_item("vitrine.test.cart").expect("cleanup");
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen_test::wasm_bindgen_test]
fn escape_guard_stops_firing_after_drop() {
    use std::cell::Cell;
    use std::rc::Rc;

    let hits = Rc::new(Cell::new(0));
    let press_escape = || {
        let init = web_sys::KeyboardEventInit::new();
        init.set_key("Escape");
        let event = web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init)
            .expect("event");
        dom::document().dispatch_event(&event).expect("dispatch");
    };

    let seen = hits.clone();
    let guard = dom::KeydownGuard::on_escape(move || seen.set(seen.get() + 1)).expect("attach");
    press_escape();
    assert_eq!(hits.get(), 1);

    drop(guard);
    press_escape();
    assert_eq!(hits.get(), 1);
}
