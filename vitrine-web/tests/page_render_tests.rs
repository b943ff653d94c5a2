use futures::executor::block_on;
use vitrine_core::Profile;
use vitrine_web::components::catalog::CatalogState;
use vitrine_web::components::password_field::{self, PasswordField};
use vitrine_web::pages::{
    home::{HomePage, HomePageProps},
    login::{LoginPage, LoginPageProps},
    not_found::{NotFound, Props as NotFoundProps},
    profile::{ProfilePage, ProfilePageProps},
    register::{RegisterPage, RegisterPageProps},
};
use yew::{Callback, LocalServerRenderer, NodeRef};

#[test]
fn home_page_wraps_catalog() {
    let props = HomePageProps {
        catalog: CatalogState::Loading,
        on_add: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    assert!(html.contains("Nossos produtos"));
    assert!(html.contains("id=\"catalogo\""));
}

#[test]
fn login_page_reflects_busy_state() {
    let idle = LoginPageProps {
        busy: false,
        on_login: Callback::noop(),
        on_register: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<LoginPage>::with_props(idle).render());
    assert!(html.contains("id=\"email\""));
    assert!(html.contains("id=\"senha\""));
    assert!(html.contains("linkCadastro"));
    assert!(!html.contains("Entrando..."));

    let busy = LoginPageProps {
        busy: true,
        on_login: Callback::noop(),
        on_register: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<LoginPage>::with_props(busy).render());
    assert!(html.contains("Entrando..."));
}

#[test]
fn register_page_has_all_fields() {
    let props = RegisterPageProps {
        busy: false,
        on_register: Callback::noop(),
        on_login: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<RegisterPage>::with_props(props).render());
    for id in ["nome", "email", "senha", "confirmarSenha"] {
        assert!(html.contains(&format!("id=\"{id}\"")), "missing input {id}");
    }
    assert!(html.contains("Cadastrar"));
}

#[test]
fn register_passwords_start_hidden_with_toggles() {
    let props = RegisterPageProps {
        busy: false,
        on_register: Callback::noop(),
        on_login: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<RegisterPage>::with_props(props).render());
    assert!(html.contains("btnMostrarSenha"));
    assert!(html.contains("btnMostrarConfirmarSenha"));
    assert!(html.contains("Mostrar confirmar senha"));
    assert_eq!(html.matches("type=\"password\"").count(), 2);
    assert_eq!(html.matches("aria-pressed=\"false\"").count(), 2);
}

#[test]
fn password_field_wires_label_and_toggle() {
    let props = password_field::Props {
        id: "senha".into(),
        label: "Senha".into(),
        toggle_id: "btnMostrarSenha".into(),
        autocomplete: "current-password".into(),
        input_ref: NodeRef::default(),
    };
    let html = block_on(LocalServerRenderer::<PasswordField>::with_props(props).render());
    assert!(html.contains("for=\"senha\""));
    assert!(html.contains("aria-controls=\"senha\""));
    assert!(html.contains("Mostrar senha"));
}

#[test]
fn profile_page_shows_fallbacks() {
    let props = ProfilePageProps {
        profile: Profile::from_parts(Some("not json"), Some("ana@loja.com")),
        on_logout: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ProfilePage>::with_props(props).render());
    assert!(html.contains("Não informado"));
    assert!(html.contains("ana@loja.com"));
    assert!(html.contains("btnLogout"));
}

#[test]
fn not_found_offers_way_home() {
    let props = NotFoundProps {
        on_go_home: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<NotFound>::with_props(props).render());
    assert!(html.contains("Voltar à loja"));
}
