use crate::components::catalog::{CatalogGrid, CatalogState};
use vitrine_core::ProductSnapshot;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HomePageProps {
    pub catalog: CatalogState,
    pub on_add: Callback<ProductSnapshot>,
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    html! {
        <section class="home">
            <h1>{ "Nossos produtos" }</h1>
            <CatalogGrid state={props.catalog.clone()} on_add={props.on_add.clone()} />
        </section>
    }
}
