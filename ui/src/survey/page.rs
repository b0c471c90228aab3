//! Page sections: exactly one of intro, survey and end is visible. Also the
//! image status shown inside the survey section.

use super::engine::{EngineState, SurveyEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Intro,
    Survey,
    End,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Intro, Page::Survey, Page::End];

    pub fn id(self) -> &'static str {
        match self {
            Page::Intro => "intro-page",
            Page::Survey => "survey-page",
            Page::End => "end-page",
        }
    }

    /// Page matching an engine state once any pending work has settled.
    pub fn for_state(state: &EngineState) -> Self {
        match state {
            EngineState::NotStarted => Page::Intro,
            EngineState::InProgress { .. } | EngineState::Submitting { .. } => Page::Survey,
            EngineState::Completed => Page::End,
        }
    }
}

/// CSS class for `page`'s section given the active one.
pub fn section_class(page: Page, active: Page) -> &'static str {
    if page == active {
        "page active"
    } else {
        "page"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Loaded,
    Failed,
}

/// View state once the current image has loaded or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettled {
    pub status: ImageStatus,
    pub progress: Option<String>,
    pub selected_score: Option<u8>,
}

/// Either outcome updates the progress label and clears the score control;
/// a failure only swaps the image for the placeholder.
pub fn on_image_settled(loaded: bool, engine: &SurveyEngine) -> ImageSettled {
    ImageSettled {
        status: if loaded {
            ImageStatus::Loaded
        } else {
            ImageStatus::Failed
        },
        progress: engine.progress_label(),
        selected_score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ident::SessionId;
    use crate::survey::catalog::ImageRef;
    use crate::survey::payload::Participant;

    fn engine_at_second_of(n: usize) -> SurveyEngine {
        let mut engine = SurveyEngine::new(SessionId::generate());
        let sample = (0..n)
            .map(|i| ImageRef::from_url(format!("https://raw.example/images/{i}.png")))
            .collect();
        engine
            .begin(Participant::new("other", "40s"), sample)
            .unwrap();
        engine
            .confirm_score(Some(4), "2025-01-01T00:00:00Z".into())
            .unwrap();
        engine
    }

    #[test]
    fn failed_image_still_updates_progress_and_clears_score() {
        let engine = engine_at_second_of(23);
        let settled = on_image_settled(false, &engine);
        assert_eq!(settled.status, ImageStatus::Failed);
        assert_eq!(settled.progress.as_deref(), Some("2 / 23"));
        assert_eq!(settled.selected_score, None);
    }

    #[test]
    fn loaded_image_reveals_with_the_same_progress() {
        let engine = engine_at_second_of(5);
        let loaded = on_image_settled(true, &engine);
        let failed = on_image_settled(false, &engine);
        assert_eq!(loaded.status, ImageStatus::Loaded);
        assert_eq!(loaded.progress, failed.progress);
        assert_eq!(loaded.selected_score, None);
    }

    #[test]
    fn score_after_failed_image_keeps_nominal_id() {
        let mut engine = engine_at_second_of(3);
        let expected = engine.current_image().map(|img| img.id.clone());
        assert_eq!(on_image_settled(false, &engine).status, ImageStatus::Failed);

        engine
            .confirm_score(Some(2), "2025-01-01T00:00:05Z".into())
            .unwrap();
        assert_eq!(engine.responses.len(), 2);
        assert_eq!(Some(engine.responses[1].image_id.clone()), expected);
        assert_eq!(engine.responses[1].image_id, "1.png");
    }

    #[test]
    fn exactly_one_section_is_active() {
        for active in Page::ALL {
            let visible = Page::ALL
                .iter()
                .filter(|p| section_class(**p, active).contains("active"))
                .count();
            assert_eq!(visible, 1);
        }
    }

    #[test]
    fn state_maps_to_page() {
        assert_eq!(Page::for_state(&EngineState::NotStarted), Page::Intro);
        assert_eq!(
            Page::for_state(&EngineState::Submitting { position: 4 }),
            Page::Survey
        );
        assert_eq!(Page::for_state(&EngineState::Completed), Page::End);
    }
}
