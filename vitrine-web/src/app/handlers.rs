use super::state::{AppState, Overlay};
use crate::api::{self, HttpOrderSubmitter};
use crate::components::catalog::CatalogState;
use crate::components::notice::Notice;
use crate::dom;
use crate::router::Route;
use vitrine_core::{
    AddOutcome, CheckoutError, LoginRequest, PaymentMethod, ProductId, ProductSnapshot,
    RegistrationRequest,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

/// Text announced after a product lands in the cart.
#[must_use]
pub fn add_notice(name: &str, outcome: AddOutcome) -> String {
    match outcome {
        AddOutcome::Added => format!("{name} adicionado ao carrinho!"),
        AddOutcome::QuantityUpdated(quantity) => {
            format!("Quantidade de {name} atualizada para {quantity}.")
        }
    }
}

/// In-app route for a configured login path, if it names one.
#[must_use]
pub fn login_route(login_path: &str) -> Option<Route> {
    Route::recognize(login_path).filter(|route| *route != Route::NotFound)
}

fn go_to_login(state: &AppState, navigator: Option<&Navigator>) {
    match (login_route(&state.config.login_path), navigator) {
        (Some(route), Some(nav)) => nav.push(&route),
        _ => dom::redirect(&state.config.login_path),
    }
}

pub fn load_catalog(state: &AppState) {
    let state = state.clone();
    spawn_local(async move {
        match api::fetch_catalog(&state.config).await {
            Ok(products) => state.catalog.set(CatalogState::from_products(products)),
            Err(err) => {
                log::error!("catalog request failed: {err}");
                state.catalog.set(CatalogState::Failed(err.to_string()));
            }
        }
    });
}

pub fn build_add_to_cart(state: &AppState) -> Callback<ProductSnapshot> {
    let state = state.clone();
    Callback::from(move |product: ProductSnapshot| {
        let store = state.cart_store();
        if let Some(outcome) = store.add_or_increment(&product) {
            state.notify(Notice::success(add_notice(&product.name, outcome)));
        }
        state.cart.set(store.load());
    })
}

pub fn build_open_cart(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if state.checkout_in_flight() {
            log::debug!("cart stays closed while orders are being sent");
            return;
        }
        state.refresh_cart();
        state.overlay.set(Overlay::Cart);
    })
}

pub fn build_close_overlay(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if !state.checkout_in_flight() {
            state.overlay.set(Overlay::None);
        }
    })
}

pub fn build_change_quantity(state: &AppState) -> Callback<(ProductId, i64)> {
    let state = state.clone();
    Callback::from(move |(id, delta): (ProductId, i64)| {
        let store = state.cart_store();
        store.change_quantity(&id, delta);
        state.cart.set(store.load());
    })
}

pub fn build_set_quantity(state: &AppState) -> Callback<(ProductId, String)> {
    let state = state.clone();
    Callback::from(move |(id, raw): (ProductId, String)| {
        let store = state.cart_store();
        store.set_quantity(&id, &raw);
        state.cart.set(store.load());
    })
}

pub fn build_remove(state: &AppState) -> Callback<ProductId> {
    let state = state.clone();
    Callback::from(move |id: ProductId| {
        let store = state.cart_store();
        store.remove(&id);
        state.cart.set(store.load());
    })
}

/// Cart popup "checkout" button: swaps the cart popup for payment selection.
pub fn build_begin_checkout(state: &AppState, navigator: Option<Navigator>) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if state.checkout_in_flight() {
            log::debug!("checkout already submitting, ignoring");
            return;
        }
        match state.storefront().begin_checkout() {
            Ok(flow) => state.overlay.set(Overlay::Checkout(flow)),
            Err(CheckoutError::LoginRequired) => {
                log::info!("checkout needs a signed-in customer, redirecting to login");
                state.overlay.set(Overlay::None);
                go_to_login(&state, navigator.as_ref());
            }
            Err(err) => state.notify(Notice::info(err.to_string())),
        }
    })
}

pub fn build_select_method(state: &AppState) -> Callback<PaymentMethod> {
    let overlay = state.overlay.clone();
    Callback::from(move |method: PaymentMethod| {
        if let Overlay::Checkout(mut flow) = (*overlay).clone()
            && flow.select_method(method).is_ok()
        {
            overlay.set(Overlay::Checkout(flow));
        }
    })
}

pub fn build_cancel_checkout(state: &AppState) -> Callback<()> {
    let overlay = state.overlay.clone();
    Callback::from(move |()| {
        let Overlay::Checkout(mut flow) = (*overlay).clone() else {
            overlay.set(Overlay::None);
            return;
        };
        match flow.cancel() {
            Ok(()) => overlay.set(Overlay::None),
            Err(err) => log::debug!("ignoring cancel: {err}"),
        }
    })
}

/// Confirm button: shows the submitting state, sends every order, then
/// settles the cart and closes the popup.
pub fn build_confirm_checkout(state: &AppState) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        if state.submitting.get() {
            return;
        }
        let Overlay::Checkout(mut flow) = (*state.overlay).clone() else {
            return;
        };
        let mut submitting = flow.clone();
        if let Err(err) = submitting.confirm() {
            state.notify(Notice::info(err.to_string()));
            return;
        }
        state.submitting.set(true);
        state.overlay.set(Overlay::Checkout(submitting));

        let state = state.clone();
        spawn_local(async move {
            let submitter = HttpOrderSubmitter::new(&state.config);
            let storefront = state.storefront();
            match storefront.complete_checkout(&mut flow, &submitter).await {
                Ok(report) => {
                    log::debug!("{} order(s) not accepted", report.failures.len());
                    state.notify(Notice::success("Pedido realizado com sucesso!"));
                }
                Err(err) => log::error!("checkout could not run: {err}"),
            }
            state.submitting.set(false);
            state.refresh_cart();
            state.overlay.set(Overlay::None);
        });
    })
}

pub fn build_logout(state: &AppState, navigator: Option<Navigator>) -> Callback<()> {
    let state = state.clone();
    Callback::from(move |()| {
        state.storefront().session().logout();
        state.refresh_session();
        go_to_login(&state, navigator.as_ref());
    })
}

pub fn build_login(state: &AppState, navigator: Option<Navigator>) -> Callback<LoginRequest> {
    let state = state.clone();
    Callback::from(move |request: LoginRequest| {
        let state = state.clone();
        let navigator = navigator.clone();
        state.busy.set(true);
        spawn_local(async move {
            match api::login(&state.config, &request).await {
                Ok(response) => {
                    state
                        .storefront()
                        .session()
                        .record_login(&request.email, &response);
                    state.refresh_session();
                    state.notify(Notice::success("Login realizado com sucesso!"));
                    if let Some(nav) = navigator {
                        nav.push(&Route::Home);
                    }
                }
                Err(err) => {
                    log::warn!("login refused: {err}");
                    state.notify(Notice::error(err.to_string()));
                }
            }
            state.busy.set(false);
        });
    })
}

pub fn build_register(
    state: &AppState,
    navigator: Option<Navigator>,
) -> Callback<RegistrationRequest> {
    let state = state.clone();
    Callback::from(move |request: RegistrationRequest| {
        let state = state.clone();
        let navigator = navigator.clone();
        state.busy.set(true);
        spawn_local(async move {
            match api::register(&state.config, &request).await {
                Ok(()) => {
                    state.notify(Notice::success(
                        "Cadastro realizado com sucesso! Faça login para continuar.",
                    ));
                    if let Some(nav) = navigator {
                        nav.push(&Route::Login);
                    }
                }
                Err(err) => {
                    log::warn!("registration refused: {err}");
                    state.notify(Notice::error(err.to_string()));
                }
            }
            state.busy.set(false);
        });
    })
}

pub fn build_navigate(navigator: Option<Navigator>) -> Callback<Route> {
    Callback::from(move |route: Route| {
        if let Some(nav) = navigator.as_ref() {
            nav.push(&route);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_notices_distinguish_new_lines_from_bumps() {
        assert_eq!(
            add_notice("Caneca", AddOutcome::Added),
            "Caneca adicionado ao carrinho!"
        );
        assert_eq!(
            add_notice("Caneca", AddOutcome::QuantityUpdated(3)),
            "Quantidade de Caneca atualizada para 3."
        );
    }

    #[test]
    fn login_path_maps_to_route_when_known() {
        assert_eq!(login_route("/login"), Some(Route::Login));
        assert_eq!(login_route("/entrar.html"), None);
    }
}
