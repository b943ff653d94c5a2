use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

impl NoticeKind {
    const fn class(self) -> &'static str {
        match self {
            Self::Success => "mensagem-sucesso",
            Self::Info => "mensagem-info",
            Self::Error => "mensagem-erro",
        }
    }
}

/// A transient message shown above the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: AttrValue,
}

impl Notice {
    pub fn success(message: impl Into<AttrValue>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<AttrValue>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<AttrValue>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<()>,
}

#[function_component(NoticeBar)]
pub fn notice_bar(props: &Props) -> Html {
    let Some(notice) = props.notice.as_ref() else {
        return Html::default();
    };
    let dismiss = {
        let cb = props.on_dismiss.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let role = if notice.kind == NoticeKind::Error {
        "alert"
    } else {
        "status"
    };
    html! {
        <div id="mensagemErro" class={classes!("notice", notice.kind.class())} role={role}>
            <span>{ notice.message.clone() }</span>
            <button type="button" class="notice__close" aria-label="Fechar aviso" onclick={dismiss}>{"×"}</button>
        </div>
    }
}
