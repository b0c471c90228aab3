use dioxus::prelude::*;

use ui::components::AppNavbar;
use ui::core::config::SurveyConfig;
use ui::views::Home;

// Shared theme (ui/assets/theme/main.css), inlined so web and desktop stay identical.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // Global reactive language code; AppNavbar updates it on selection.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);
    use_context_provider(SurveyConfig::from_env);

    rsx! {
        document::Title { "pixpoll" }
        document::Style { "{MAIN_CSS_INLINE}" }

        AppNavbar {}
        Home {}
    }
}
