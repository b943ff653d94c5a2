use crate::components::pix_qr::PixQr;
use crate::components::popup::Popup;
use vitrine_core::{
    BrCodeEncoder, CheckoutFlow, CheckoutStage, PaymentMethod, PixConfig, format_price, total,
};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub flow: CheckoutFlow,
    pub pix: PixConfig,
    pub on_select: Callback<PaymentMethod>,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

fn method_option(method: PaymentMethod, selected: bool, on_select: &Callback<PaymentMethod>) -> Html {
    let id = format!("pagamento-{}", method.as_str());
    let onchange = {
        let cb = on_select.clone();
        Callback::from(move |_: Event| cb.emit(method))
    };
    html! {
        <li class="payment-option">
            <input
                type="radio"
                name="formaPagamento"
                id={id.clone()}
                value={method.as_str()}
                checked={selected}
                {onchange}
            />
            <label for={id}>{ method.label() }</label>
        </li>
    }
}

/// Payment method selection and confirmation for a checkout in progress.
#[function_component(CheckoutPopup)]
pub fn checkout_popup(props: &Props) -> Html {
    let submitting = props.flow.stage() == CheckoutStage::Submitting;
    let confirm = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let amount = format_price(total(props.flow.snapshot()));

    let body = if submitting {
        html! {
            <p class="checkout-processing" role="status" aria-live="polite">
                { "Processando pedido..." }
            </p>
        }
    } else {
        let pix = props
            .flow
            .pix_charge(&props.pix, &BrCodeEncoder)
            .map(|charge| html! { <PixQr {charge} /> })
            .unwrap_or_default();
        html! {
            <>
                <fieldset class="payment-methods">
                    <legend>{ "Escolha a forma de pagamento" }</legend>
                    <ul>
                        { for PaymentMethod::ALL.iter().map(|m| {
                            method_option(*m, props.flow.method() == Some(*m), &props.on_select)
                        }) }
                    </ul>
                </fieldset>
                { pix }
                <div class="checkout-actions">
                    <button
                        type="button"
                        id="btnConfirmarPagamento"
                        class="btn-primary"
                        disabled={props.flow.method().is_none()}
                        onclick={confirm}
                    >
                        { "Confirmar pagamento" }
                    </button>
                    <button type="button" id="btnCancelarPagamento" onclick={cancel}>
                        { "Cancelar" }
                    </button>
                </div>
            </>
        }
    };

    html! {
        <Popup
            id="checkout-popup"
            title="Pagamento"
            dismissible={!submitting}
            on_close={props.on_cancel.clone()}
        >
            <p class="checkout-total">{ format!("Total: {amount}") }</p>
            { body }
        </Popup>
    }
}
