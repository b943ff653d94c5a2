use crate::dom;
use vitrine_core::{PixCharge, format_price};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub charge: PixCharge,
}

/// PIX QR code with its copy-and-paste payload.
#[function_component(PixQr)]
pub fn pix_qr(props: &Props) -> Html {
    let qr_ref = use_node_ref();
    let copied = use_state(|| false);

    {
        let qr_ref = qr_ref.clone();
        use_effect_with(props.charge.payload.clone(), move |payload| {
            if let Some(container) = qr_ref.cast::<web_sys::Element>()
                && !dom::render_qr_code(&container, payload)
            {
                log::debug!("no QRCode renderer on the page, showing payload only");
            }
            || {}
        });
    }

    let copy = {
        let payload = props.charge.payload.clone();
        let copied = copied.clone();
        Callback::from(move |_| {
            dom::copy_to_clipboard(&payload);
            crate::a11y::set_status("Código PIX copiado.");
            copied.set(true);
        })
    };

    html! {
        <div id="pix-container" class="pix">
            <p class="pix__amount">{ format!("Valor: {}", format_price(props.charge.amount)) }</p>
            <div id="pix-qrcode" class="pix__qr" ref={qr_ref} aria-hidden="true"></div>
            <p class="pix__key">{ format!("Chave PIX: {}", props.charge.key) }</p>
            <label for="pix-payload">{ "PIX copia e cola" }</label>
            <textarea id="pix-payload" class="pix__payload" readonly=true value={props.charge.payload.clone()} />
            <button type="button" class="pix__copy" onclick={copy}>
                { if *copied { "Copiado!" } else { "Copiar código" } }
            </button>
        </div>
    }
}
