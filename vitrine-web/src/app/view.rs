use super::handlers;
use super::state::{AppState, Overlay};
use crate::components::cart_popup::CartPopup;
use crate::components::checkout_popup::CheckoutPopup;
use crate::components::header::Header;
use crate::components::notice::NoticeBar;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFound;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::*;

fn render_overlay(state: &AppState, navigator: Option<&Navigator>) -> Html {
    let close = handlers::build_close_overlay(state);
    match &*state.overlay {
        Overlay::None => Html::default(),
        Overlay::Cart => html! {
            <CartPopup
                cart={(*state.cart).clone()}
                on_change_quantity={handlers::build_change_quantity(state)}
                on_set_quantity={handlers::build_set_quantity(state)}
                on_remove={handlers::build_remove(state)}
                on_checkout={handlers::build_begin_checkout(state, navigator.cloned())}
                on_close={close}
            />
        },
        Overlay::Checkout(flow) => html! {
            <CheckoutPopup
                flow={flow.clone()}
                pix={state.config.pix.clone()}
                on_select={handlers::build_select_method(state)}
                on_confirm={handlers::build_confirm_checkout(state)}
                on_cancel={handlers::build_cancel_checkout(state)}
            />
        },
    }
}

fn render_route(state: &AppState, route: &Route, navigator: Option<&Navigator>) -> Html {
    if route.is_guest_only() && *state.logged_in {
        return html! { <Redirect<Route> to={Route::Home} /> };
    }
    match route {
        Route::Home => html! {
            <HomePage
                catalog={(*state.catalog).clone()}
                on_add={handlers::build_add_to_cart(state)}
            />
        },
        Route::Login => {
            let to_register = handlers::build_navigate(navigator.cloned())
                .reform(|()| Route::Register);
            html! {
                <LoginPage
                    busy={*state.busy}
                    on_login={handlers::build_login(state, navigator.cloned())}
                    on_register={to_register}
                />
            }
        }
        Route::Register => {
            let to_login = handlers::build_navigate(navigator.cloned()).reform(|()| Route::Login);
            html! {
                <RegisterPage
                    busy={*state.busy}
                    on_register={handlers::build_register(state, navigator.cloned())}
                    on_login={to_login}
                />
            }
        }
        Route::Profile => {
            let storefront = state.storefront();
            if storefront.session().require_identity().is_none() {
                return html! { <Redirect<Route> to={Route::Login} /> };
            }
            html! {
                <ProfilePage
                    profile={storefront.session().profile()}
                    on_logout={handlers::build_logout(state, navigator.cloned())}
                />
            }
        }
        Route::NotFound => {
            let go_home = handlers::build_navigate(navigator.cloned()).reform(|()| Route::Home);
            html! { <NotFound on_go_home={go_home} /> }
        }
    }
}

pub fn render_app(state: &AppState, route: &Route, navigator: Option<Navigator>) -> Html {
    let dismiss_notice = {
        let notice = state.notice.clone();
        Callback::from(move |()| notice.set(None))
    };
    let nav = navigator.as_ref();

    html! {
        <>
            <style>{ crate::a11y::visible_focus_css() }</style>
            <Header
                badge={*state.badge}
                logged_in={*state.logged_in}
                cart_locked={state.checkout_in_flight()}
                on_open_cart={handlers::build_open_cart(state)}
                on_navigate={handlers::build_navigate(navigator.clone())}
                on_logout={handlers::build_logout(state, navigator.clone())}
            />
            <div id={crate::a11y::STATUS_REGION_ID} class="sr-only" aria-live="polite"></div>
            <NoticeBar notice={(*state.notice).clone()} on_dismiss={dismiss_notice} />
            <main id="main" role="main">
                { render_route(state, route, nav) }
            </main>
            { render_overlay(state, nav) }
        </>
    }
}
