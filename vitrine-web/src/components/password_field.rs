use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub label: AttrValue,
    /// Id of the show/hide button.
    pub toggle_id: AttrValue,
    pub autocomplete: AttrValue,
    pub input_ref: NodeRef,
}

/// Password input with a button that reveals or hides what was typed.
#[function_component(PasswordField)]
pub fn password_field(p: &Props) -> Html {
    let visible = use_state(|| false);
    let toggle = {
        let visible = visible.clone();
        Callback::from(move |_: MouseEvent| visible.set(!*visible))
    };
    let (input_type, action) = if *visible {
        ("text", "Ocultar")
    } else {
        ("password", "Mostrar")
    };
    let toggle_label = format!("{action} {}", p.label.to_lowercase());

    html! {
        <>
            <label for={p.id.clone()}>{ p.label.clone() }</label>
            <div class="campo-senha">
                <input
                    id={p.id.clone()}
                    type={input_type}
                    autocomplete={p.autocomplete.clone()}
                    ref={p.input_ref.clone()}
                />
                <button
                    type="button"
                    id={p.toggle_id.clone()}
                    class="btn-mostrar-senha"
                    aria-label={toggle_label}
                    aria-controls={p.id.clone()}
                    aria-pressed={visible.to_string()}
                    onclick={toggle}
                >
                    { action }
                </button>
            </div>
        </>
    }
}
