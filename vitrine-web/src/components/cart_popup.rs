use crate::components::popup::Popup;
use vitrine_core::{Cart, CartItem, ProductId, format_price, item_count, total};
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Freshly loaded cart; the popup never keeps its own copy.
    pub cart: Cart,
    pub on_change_quantity: Callback<(ProductId, i64)>,
    pub on_set_quantity: Callback<(ProductId, String)>,
    pub on_remove: Callback<ProductId>,
    pub on_checkout: Callback<()>,
    pub on_close: Callback<()>,
}

fn line_view(item: &CartItem, props: &Props) -> Html {
    let step = |delta: i64| {
        let cb = props.on_change_quantity.clone();
        let id = item.id.clone();
        Callback::from(move |_| cb.emit((id.clone(), delta)))
    };
    let on_input = {
        let cb = props.on_set_quantity.clone();
        let id = item.id.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            {
                cb.emit((id.clone(), input.value()));
            }
        })
    };
    let on_remove = {
        let cb = props.on_remove.clone();
        let id = item.id.clone();
        Callback::from(move |_| cb.emit(id.clone()))
    };
    let qty_id = format!("qty-{}", item.id);

    html! {
        <li class="cart-item" data-id={item.id.to_string()}>
            <div class="cart-item__info">
                <span class="cart-item__name">{ item.name.clone() }</span>
                <span class="cart-item__price">{ format_price(item.unit_price) }</span>
            </div>
            <div class="cart-item__controls">
                <button type="button" class="qty-dec" aria-label="Diminuir quantidade" onclick={step(-1)}>{"−"}</button>
                <label for={qty_id.clone()} class="sr-only">{ "Quantidade" }</label>
                <input
                    id={qty_id}
                    class="qty-input"
                    type="number"
                    min="1"
                    value={item.quantity.to_string()}
                    onchange={on_input}
                />
                <button type="button" class="qty-inc" aria-label="Aumentar quantidade" onclick={step(1)}>{"+"}</button>
                <button type="button" class="cart-item__remove" onclick={on_remove}>{ "Remover" }</button>
            </div>
            <span class="cart-item__subtotal">{ format_price(item.subtotal()) }</span>
        </li>
    }
}

#[function_component(CartPopup)]
pub fn cart_popup(props: &Props) -> Html {
    let checkout = {
        let cb = props.on_checkout.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let body = if props.cart.is_empty() {
        html! { <p class="cart-empty">{ "Seu carrinho está vazio." }</p> }
    } else {
        html! {
            <ul class="cart-items">
                { for props.cart.items().iter().map(|item| line_view(item, props)) }
            </ul>
        }
    };

    html! {
        <Popup id="cart-popup" title="Seu carrinho" on_close={props.on_close.clone()}>
            { body }
            <div class="cart-summary">
                <span class="cart-summary__count">{ format!("{} itens", item_count(&props.cart)) }</span>
                <strong class="cart-summary__total">{ format!("Total: {}", format_price(total(&props.cart))) }</strong>
            </div>
            <button
                type="button"
                id="btnFinalizar"
                class="btn-primary"
                disabled={props.cart.is_empty()}
                onclick={checkout}
            >
                { "Finalizar compra" }
            </button>
        </Popup>
    }
}
