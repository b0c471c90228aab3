//! Survey component: intro form, image rating loop and end page, driven by a
//! single event coroutine that owns the session engine.

use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::core::config::SurveyConfig;
use crate::core::ident::SessionId;
use crate::core::{format, platform};
use crate::t;

use super::catalog::GitHubCatalog;
use super::engine::SurveyEngine;
use super::error::{CatalogError, SubmissionError, SurveyError, ValidationError};
use super::flow::{self, Step};
use super::page::{on_image_settled, section_class, ImageStatus, Page};
use super::payload::{Participant, AGE_OPTIONS, GENDER_OPTIONS, SCORE_SCALE};
use super::submit::SubmissionClient;
use super::transport::PlatformTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Idle,
    LoadingCatalog,
    Submitting,
}

#[derive(Debug, Clone)]
enum SurveyEvent {
    Start(Participant),
    Confirm(Option<u8>),
    Back,
}

#[component]
pub fn SurveyView() -> Element {
    let config = try_use_context::<SurveyConfig>().unwrap_or_else(SurveyConfig::from_env);
    // Reading the language signal re-renders labels on switch without remounting the session.
    let _lang_marker = try_use_context::<Signal<String>>()
        .map(|code| code())
        .unwrap_or_default();
    // One identifier per page load.
    let session_id = use_hook(SessionId::generate);

    let snapshot = use_signal({
        let session_id = session_id.clone();
        move || SurveyEngine::new(session_id)
    });
    let page = use_signal(|| Page::Intro);
    let busy = use_signal(|| Busy::Idle);
    let mut image_status = use_signal(|| ImageStatus::Loading);
    let mut progress = use_signal(|| Option::<String>::None);
    let mut selected_score = use_signal(|| Option::<u8>::None);
    let mut gender = use_signal(String::new);
    let mut age = use_signal(String::new);
    let last_error = use_signal(|| Option::<String>::None);

    let coroutine = use_coroutine(move |mut rx: UnboundedReceiver<SurveyEvent>| {
        let config = config.clone();
        let session_id = session_id.clone();
        let mut snapshot = snapshot;
        let mut page = page;
        let mut busy = busy;
        let mut image_status = image_status;
        let mut selected_score = selected_score;
        let mut last_error = last_error;

        async move {
            let catalog = GitHubCatalog::new();
            let client = SubmissionClient::new(
                config.submission_endpoint.clone(),
                PlatformTransport::default(),
            );
            let mut engine = SurveyEngine::new(session_id);

            while let Some(event) = rx.next().await {
                last_error.set(None);
                match event {
                    SurveyEvent::Start(participant) => {
                        if let Err(err) = participant.validate() {
                            report(&SurveyError::from(err), &mut last_error);
                            continue;
                        }
                        busy.set(Busy::LoadingCatalog);
                        page.set(Page::Survey);
                        image_status.set(ImageStatus::Loading);

                        let started = flow::start(&mut engine, participant, &config, &catalog).await;
                        busy.set(Busy::Idle);
                        match started {
                            Ok(()) => {
                                selected_score.set(None);
                                snapshot.set(engine.clone());
                            }
                            Err(err) => {
                                page.set(Page::Intro);
                                report(&err, &mut last_error);
                            }
                        }
                    }
                    SurveyEvent::Confirm(score) => {
                        let confirmed = flow::confirm(&mut engine, score, &client, |eng| {
                            snapshot.set(eng.clone());
                            busy.set(Busy::Submitting);
                        })
                        .await;
                        busy.set(Busy::Idle);
                        snapshot.set(engine.clone());

                        match confirmed {
                            Ok(Step::Advanced { .. }) => {
                                image_status.set(ImageStatus::Loading);
                                selected_score.set(None);
                            }
                            Ok(Step::Completed) => page.set(Page::for_state(&engine.state)),
                            Err(err) => report(&err, &mut last_error),
                        }
                    }
                    SurveyEvent::Back => match engine.go_back() {
                        Ok(true) => {
                            image_status.set(ImageStatus::Loading);
                            selected_score.set(None);
                            snapshot.set(engine.clone());
                        }
                        Ok(false) => {}
                        Err(err) => report(&err, &mut last_error),
                    },
                }
            }
        }
    });

    let engine = snapshot();
    let active = page();
    let busy_now = busy();
    let status = image_status();
    let at_first = engine.position().map(|p| p == 0).unwrap_or(true);
    let current = engine.current_image().cloned();
    let retry_hint = engine.has_pending_tail();
    let image_style = if status == ImageStatus::Loaded {
        ""
    } else {
        "display:none"
    };
    let failed_url = current
        .as_ref()
        .map(|image| image.url.clone())
        .unwrap_or_default();

    rsx! {
        section { id: Page::Intro.id(), class: section_class(Page::Intro, active),
            h2 { {t!("intro-heading")} }
            p { {t!("intro-body")} }

            fieldset { class: "intro__field",
                legend { {t!("gender-label")} }
                for value in GENDER_OPTIONS {
                    label { key: "{value}", class: "intro__choice",
                        input {
                            r#type: "radio",
                            name: "gender",
                            value: "{value}",
                            checked: gender() == value,
                            onchange: move |_| gender.set(value.to_string()),
                        }
                        {gender_label(value)}
                    }
                }
            }

            div { class: "intro__field",
                label { r#for: "age", {t!("age-label")} }
                select {
                    id: "age",
                    value: "{age}",
                    onchange: move |evt: FormEvent| age.set(evt.value()),
                    option { value: "", {t!("age-placeholder")} }
                    for value in AGE_OPTIONS {
                        option { key: "{value}", value: "{value}", {age_label(value)} }
                    }
                }
            }

            button {
                r#type: "button",
                id: "startBtn",
                class: "button button--primary",
                disabled: busy_now != Busy::Idle,
                onclick: move |_| coroutine.send(SurveyEvent::Start(Participant::new(gender(), age()))),
                {t!("start-button")}
            }
        }

        section { id: Page::Survey.id(), class: section_class(Page::Survey, active),
            if let Some(text) = progress() {
                div { id: "progress", class: "survey__progress", "{text}" }
            }

            div { class: "survey__frame",
                if busy_now == Busy::LoadingCatalog {
                    p { class: "survey__loading", {t!("survey-preparing")} }
                } else if let Some(image) = current {
                    {match status {
                        ImageStatus::Loading => rsx! {
                            p { id: "loading", class: "survey__loading", {t!("survey-loading")} }
                        },
                        ImageStatus::Failed => rsx! {
                            p { id: "loading", class: "survey__loading survey__loading--failed", {t!("survey-image-failed")} }
                        },
                        ImageStatus::Loaded => rsx! {},
                    }}
                    img {
                        id: "survey-image",
                        class: "survey__image",
                        src: "{image.url}",
                        alt: t!("survey-image-alt"),
                        style: image_style,
                        onload: move |_| {
                            let settled = on_image_settled(true, &snapshot.read());
                            image_status.set(settled.status);
                            progress.set(settled.progress);
                            selected_score.set(settled.selected_score);
                        },
                        onerror: move |_| {
                            warn!(url = %failed_url, "image failed to load");
                            let settled = on_image_settled(false, &snapshot.read());
                            image_status.set(settled.status);
                            progress.set(settled.progress);
                            selected_score.set(settled.selected_score);
                        },
                    }
                }
            }

            fieldset { class: "survey__scale",
                legend { {t!("score-legend")} }
                span { class: "survey__anchor", {t!("score-low")} }
                for score in SCORE_SCALE {
                    label { key: "{score}", class: "survey__score",
                        input {
                            r#type: "radio",
                            name: "score",
                            value: "{score}",
                            checked: selected_score() == Some(score),
                            onchange: move |_| selected_score.set(Some(score)),
                        }
                        span { {format::format_score(score)} }
                    }
                }
                span { class: "survey__anchor", {t!("score-high")} }
            }

            if retry_hint {
                p { class: "survey__hint", {t!("survey-retry-hint")} }
            }

            div { class: "survey__controls",
                button {
                    r#type: "button",
                    id: "prevBtn",
                    class: "button button--ghost",
                    disabled: busy_now != Busy::Idle || at_first,
                    onclick: move |_| coroutine.send(SurveyEvent::Back),
                    {t!("prev-button")}
                }
                button {
                    r#type: "button",
                    id: "nextBtn",
                    class: "button button--primary",
                    disabled: busy_now != Busy::Idle,
                    onclick: move |_| coroutine.send(SurveyEvent::Confirm(selected_score())),
                    {t!("next-button")}
                }
            }

            if busy_now == Busy::Submitting {
                p { class: "survey__submitting", {t!("survey-submitting")} }
            }
        }

        section { id: Page::End.id(), class: section_class(Page::End, active),
            h2 { {t!("end-heading")} }
            p { {t!("end-body")} }
        }

        if let Some(err) = last_error() {
            div { class: "survey__error", role: "alert", "{err}" }
        }
    }
}

fn report(err: &SurveyError, last_error: &mut Signal<Option<String>>) {
    let message = alert_text(&error_message(err));
    platform::notify_user(&message);
    last_error.set(Some(message));
}

fn alert_text(message: &str) -> String {
    format!("⚠️ {message}")
}

fn error_message(err: &SurveyError) -> String {
    match err {
        SurveyError::Validation(ValidationError::MissingDemographics) => {
            t!("error-missing-demographics")
        }
        SurveyError::Validation(ValidationError::MissingScore) => t!("error-missing-score"),
        SurveyError::Validation(ValidationError::ScoreOutOfRange(_)) => t!("error-score-range"),
        SurveyError::Catalog(CatalogError::Empty) => t!("error-catalog-empty"),
        SurveyError::Catalog(err) => t!("error-catalog", detail = err.to_string()),
        SurveyError::Submission(SubmissionError::Server(message)) => {
            t!("error-server", message = message.as_str())
        }
        SurveyError::Submission(SubmissionError::Timeout(_)) => t!("error-timeout"),
        SurveyError::Submission(_) => t!("error-network"),
        SurveyError::SubmissionInFlight => t!("error-in-flight"),
        SurveyError::NotInProgress => t!("error-not-started"),
    }
}

fn gender_label(value: &str) -> String {
    match value {
        "male" => t!("gender-male"),
        "female" => t!("gender-female"),
        _ => t!("gender-other"),
    }
}

fn age_label(value: &str) -> String {
    match value {
        "10s" => t!("age-10s"),
        "20s" => t!("age-20s"),
        "30s" => t!("age-30s"),
        "40s" => t!("age-40s"),
        "50s" => t!("age-50s"),
        _ => t!("age-60-plus"),
    }
}
