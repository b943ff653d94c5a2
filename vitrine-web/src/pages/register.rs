use super::login::input_value;
use crate::a11y;
use crate::components::password_field::PasswordField;
use vitrine_core::{Field, RegistrationForm, RegistrationRequest};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct RegisterPageProps {
    pub busy: bool,
    pub on_register: Callback<RegistrationRequest>,
    pub on_login: Callback<()>,
}

#[function_component(RegisterPage)]
pub fn register_page(props: &RegisterPageProps) -> Html {
    let name_ref = use_node_ref();
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let confirm_ref = use_node_ref();
    let error = use_state(|| None::<AttrValue>);

    let on_submit = {
        let refs = (
            name_ref.clone(),
            email_ref.clone(),
            password_ref.clone(),
            confirm_ref.clone(),
        );
        let error = error.clone();
        let cb = props.on_register.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let form = RegistrationForm {
                name: input_value(&refs.0),
                email: input_value(&refs.1),
                password: input_value(&refs.2),
                confirm_password: input_value(&refs.3),
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
    let login = {
        let cb = props.on_login.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };

    html! {
        <section class="cadastro">
            <h1>{ "Criar conta" }</h1>
            <form id="cadastroForm" onsubmit={on_submit} novalidate=true>
                <label for={Field::Name.input_id()}>{ "Nome completo" }</label>
                <input id={Field::Name.input_id()} type="text" autocomplete="name" ref={name_ref} />
                <label for={Field::Email.input_id()}>{ "Email" }</label>
                <input id={Field::Email.input_id()} type="email" autocomplete="email" ref={email_ref} />
                <PasswordField
                    id={Field::Password.input_id()}
                    label="Senha"
                    toggle_id="btnMostrarSenha"
                    autocomplete="new-password"
                    input_ref={password_ref}
                />
                <PasswordField
                    id={Field::ConfirmPassword.input_id()}
                    label="Confirmar senha"
                    toggle_id="btnMostrarConfirmarSenha"
                    autocomplete="new-password"
                    input_ref={confirm_ref}
                />
                if let Some(message) = (*error).clone() {
                    <p class="mensagem-erro" role="alert">{ message }</p>
                }
                <button type="submit" id="btnCadastro" disabled={props.busy}>
                    { if props.busy { "Cadastrando..." } else { "Cadastrar" } }
                </button>
            </form>
            <p class="cadastro__login">
                { "Já tem conta? " }
                <a href="/login" onclick={login}>{ "Entrar" }</a>
            </p>
        </section>
    }
}
