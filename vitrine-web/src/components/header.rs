use crate::router::Route;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Sum of cart quantities.
    pub badge: u64,
    pub logged_in: bool,
    /// Orders are being sent; the cart cannot be reopened.
    #[prop_or_default]
    pub cart_locked: bool,
    pub on_open_cart: Callback<()>,
    pub on_navigate: Callback<Route>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let go = |route: Route| {
        let cb = p.on_navigate.clone();
        Callback::from(move |_| cb.emit(route.clone()))
    };
    let open_cart = {
        let cb = p.on_open_cart.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let logout = {
        let cb = p.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cart_label = format!("Abrir carrinho, {} itens", p.badge);

    html! {
        <header role="banner">
            <a href="#main" class="sr-only">{ "Pular para o conteúdo" }</a>
            <div class="header-content">
                <button type="button" class="brand" onclick={go(Route::Home)}>{ "Vitrine" }</button>
                <nav class="header-right" aria-label="Conta">
                    if p.logged_in {
                        <button type="button" id="btnPerfil" onclick={go(Route::Profile)}>{ "Meu perfil" }</button>
                        <button type="button" id="btnLogout" onclick={logout}>{ "Sair" }</button>
                    } else {
                        <button type="button" id="btnLoginHeader" onclick={go(Route::Login)}>{ "Entrar" }</button>
                    }
                    <button type="button" id="btnCarrinho" class="cart-button" aria-label={cart_label} disabled={p.cart_locked} onclick={open_cart}>
                        { "Carrinho" }
                        <span id="cart-count" class="badge">{ p.badge.to_string() }</span>
                    </button>
                </nav>
            </div>
        </header>
    }
}
