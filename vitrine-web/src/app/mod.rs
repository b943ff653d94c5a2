#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod handlers;
pub mod state;
pub mod view;

pub use state::{AppState, Overlay};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let app_state = state::use_app_state();
    {
        let app_state = app_state.clone();
        use_effect_with((), move |_| {
            app_state.refresh_cart();
            app_state.refresh_session();
            handlers::load_catalog(&app_state);
            || {}
        });
    }

    let navigator = use_navigator();
    let route = use_route::<Route>().unwrap_or(Route::NotFound);

    view::render_app(&app_state, &route, navigator)
}
