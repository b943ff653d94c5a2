use std::rc::Rc;
use vitrine_core::{CatalogProduct, ProductSnapshot, format_price};
use yew::prelude::*;

/// What the catalog grid is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Loading,
    Failed(String),
    Loaded(Rc<Vec<CatalogProduct>>),
}

impl CatalogState {
    #[must_use]
    pub fn from_products(products: Vec<CatalogProduct>) -> Self {
        Self::Loaded(Rc::new(products))
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct CardProps {
    pub product: CatalogProduct,
    pub on_add: Callback<ProductSnapshot>,
}

#[function_component(ProductCard)]
pub fn product_card(props: &CardProps) -> Html {
    let snapshot = props.product.snapshot().filter(|s| s.id.is_some());
    let price = props
        .product
        .price
        .map(|price| html! { <p class="preco">{ format_price(price) }</p> })
        .unwrap_or_default();
    let add_button = snapshot.map_or_else(Html::default, |snapshot| {
        let cb = props.on_add.clone();
        let label = format!("Adicionar {} ao carrinho", snapshot.name);
        let onclick = Callback::from(move |_| cb.emit(snapshot.clone()));
        html! {
            <button type="button" class="btn-adicionar" aria-label={label} {onclick}>
                { "Adicionar ao carrinho" }
            </button>
        }
    });

    html! {
        <div class="card">
            <h3>{ props.product.name.clone() }</h3>
            { price }
            { add_button }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub state: CatalogState,
    pub on_add: Callback<ProductSnapshot>,
}

#[function_component(CatalogGrid)]
pub fn catalog_grid(props: &Props) -> Html {
    let body = match &props.state {
        CatalogState::Loading => html! { <p class="catalogo-aviso">{ "Carregando produtos..." }</p> },
        CatalogState::Failed(err) => html! {
            <p class="catalogo-aviso catalogo-erro" role="alert">
                { format!("Erro ao carregar produtos: {err}") }
            </p>
        },
        CatalogState::Loaded(products) if products.is_empty() => html! {
            <p class="catalogo-aviso">{ "Nenhum produto cadastrado ainda." }</p>
        },
        CatalogState::Loaded(products) => products
            .iter()
            .map(|product| {
                html! { <ProductCard product={product.clone()} on_add={props.on_add.clone()} /> }
            })
            .collect::<Html>(),
    };
    html! {
        <section id="catalogo" class="catalogo" aria-busy={(props.state == CatalogState::Loading).to_string()}>
            { body }
        </section>
    }
}
