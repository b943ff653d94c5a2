use crate::a11y;
use vitrine_core::{Field, LoginForm, LoginRequest};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LoginPageProps {
    /// A login request is in flight.
    pub busy: bool,
    pub on_login: Callback<LoginRequest>,
    pub on_register: Callback<()>,
}

pub(crate) fn input_value(node: &NodeRef) -> String {
    node.cast::<web_sys::HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let error = use_state(|| None::<AttrValue>);

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let error = error.clone();
        let cb = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let form = LoginForm {
                email: input_value(&email_ref),
                password: input_value(&password_ref),
            };
            match form.validate() {
                Ok(request) => {
                    error.set(None);
                    cb.emit(request);
                }
                Err(err) => {
                    error.set(Some(err.to_string().into()));
                    a11y::focus_element(err.field().input_id());
                }
            }
        })
    };
    let register = {
        let cb = props.on_register.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };

    html! {
        <section class="login">
            <h1>{ "Entrar" }</h1>
            <form id="loginForm" onsubmit={on_submit} novalidate=true>
                <label for={Field::Email.input_id()}>{ "Email" }</label>
                <input id={Field::Email.input_id()} type="email" autocomplete="email" ref={email_ref} />
                <label for={Field::Password.input_id()}>{ "Senha" }</label>
                <input id={Field::Password.input_id()} type="password" autocomplete="current-password" ref={password_ref} />
                if let Some(message) = (*error).clone() {
                    <p class="mensagem-erro" role="alert">{ message }</p>
                }
                <button type="submit" id="btnLogin" disabled={props.busy}>
                    { if props.busy { "Entrando..." } else { "Entrar" } }
                </button>
            </form>
            <p class="login__cadastro">
                { "Ainda não tem conta? " }
                <a href="/cadastro" id="linkCadastro" onclick={register}>{ "Cadastre-se" }</a>
            </p>
        </section>
    }
}
