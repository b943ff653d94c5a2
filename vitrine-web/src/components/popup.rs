use crate::dom::KeydownGuard;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub title: AttrValue,
    pub on_close: Callback<()>,
    /// Whether backdrop clicks and Escape close the popup.
    #[prop_or(true)]
    pub dismissible: bool,
    #[prop_or_default]
    pub children: Children,
}

/// Backdrop plus dialog shell shared by the cart and checkout popups.
///
/// The Escape listener lives exactly as long as the mounted, dismissible
/// popup: it is attached in an effect and released by the effect's cleanup.
#[function_component(Popup)]
pub fn popup(props: &Props) -> Html {
    {
        let on_close = props.on_close.clone();
        use_effect_with(
            (props.dismissible, on_close),
            move |(dismissible, on_close)| {
                let guard = if *dismissible {
                    let cb = on_close.clone();
                    KeydownGuard::on_escape(move || cb.emit(()))
                        .map_err(|err| {
                            log::warn!(
                                "escape listener not attached: {}",
                                crate::dom::js_error_message(&err)
                            );
                        })
                        .ok()
                } else {
                    None
                };
                move || drop(guard)
            },
        );
    }

    let on_backdrop = {
        let cb = props.on_close.clone();
        let dismissible = props.dismissible;
        Callback::from(move |_: MouseEvent| {
            if dismissible {
                cb.emit(());
            }
        })
    };
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());
    let on_close_button = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let title_id = format!("{}-title", props.id);

    html! {
        <div class="popup-backdrop" role="presentation" onclick={on_backdrop}>
            <div
                id={props.id.clone()}
                class="popup"
                role="dialog"
                aria-modal="true"
                aria-labelledby={title_id.clone()}
                onclick={keep_open}
            >
                <div class="popup__header">
                    <h2 id={title_id}>{ props.title.clone() }</h2>
                    if props.dismissible {
                        <button type="button" class="popup__close" aria-label="Fechar" onclick={on_close_button}>
                            {"×"}
                        </button>
                    }
                </div>
                <div class="popup__body">
                    { for props.children.iter() }
                </div>
            </div>
        </div>
    }
}
