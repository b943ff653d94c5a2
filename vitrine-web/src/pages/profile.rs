use vitrine_core::Profile;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ProfilePageProps {
    pub profile: Profile,
    pub on_logout: Callback<()>,
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfilePageProps) -> Html {
    let logout = {
        let cb = props.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <section class="perfil">
            <h1>{ "Meu perfil" }</h1>
            <dl>
                <dt>{ "Nome" }</dt>
                <dd id="nomePerfil">{ props.profile.name.clone() }</dd>
                <dt>{ "Email" }</dt>
                <dd id="emailPerfil">{ props.profile.email.clone() }</dd>
            </dl>
            <button type="button" id="btnLogout" onclick={logout}>{ "Sair" }</button>
        </section>
    }
}
