//! Interactive prompts: configuration and the search loop.

use anyhow::Context;
use cityweather_core::{CityDirectory, Config, Language, ViewState, WeatherController};
use inquire::{
    CustomType, CustomUserError, InquireError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
};
use tokio::sync::watch;

use crate::render;

const RANDOM_COMMAND: &str = "/random";
const QUIT_COMMAND: &str = "/quit";

/// Feeds catalog matches to the inquire text prompt.
#[derive(Debug, Clone)]
pub struct CitySuggester {
    directory: CityDirectory,
    limit: usize,
}

impl CitySuggester {
    pub fn new(directory: CityDirectory, limit: usize) -> Self {
        Self { directory, limit }
    }
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let names = self.directory.suggest(input, self.limit);
        Ok(names.into_iter().map(str::to_owned).collect())
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        if highlighted_suggestion.is_some() {
            return Ok(highlighted_suggestion);
        }

        let first = self.directory.suggest(input, 1).first().copied();
        Ok(first.map(str::to_owned))
    }
}

pub fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let languages = Language::all().to_vec();
    let cursor = languages
        .iter()
        .position(|lang| *lang == config.language)
        .unwrap_or(0);
    config.language = Select::new("Language / 语言:", languages)
        .with_starting_cursor(cursor)
        .prompt()?;

    config.suggestion_limit = CustomType::<usize>::new("Maximum autocomplete suggestions:")
        .with_default(config.suggestion_limit)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let base_url = Text::new("Open-Meteo base URL:")
        .with_default(&config.base_url)
        .prompt()?;
    config.base_url = base_url.trim().to_string();

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

/// Drive `lookup` to completion, printing the loading line once `view`
/// reports the request as in flight. Also returns whether the line was shown.
async fn with_indicator<T>(
    view: &mut watch::Receiver<ViewState>,
    language: Language,
    lookup: impl Future<Output = T>,
) -> (T, bool) {
    tokio::pin!(lookup);
    let mut shown = false;

    loop {
        tokio::select! {
            biased;

            Ok(()) = view.changed(), if !shown => {
                if view.borrow_and_update().loading {
                    println!("{}", render::loading(language));
                    shown = true;
                }
            }
            out = &mut lookup => return (out, shown),
        }
    }
}

/// Load a random city, then keep prompting until the user quits.
pub async fn interactive(mut controller: WeatherController) -> anyhow::Result<()> {
    let language = controller.language();
    let directory = controller.directory().clone();
    let suggester = CitySuggester::new(directory, controller.suggestion_limit());
    let mut view = controller.subscribe();
    let mut rng = rand::rng();

    let (message, help) = match language {
        Language::Zh => (
            "输入城市名称:",
            "↑↓ 选择建议, Tab 补全, /random 随机城市, /quit 退出",
        ),
        Language::En => (
            "City name:",
            "↑↓ to pick a suggestion, Tab to complete, /random for a random city, /quit to exit",
        ),
    };

    let lookup = controller.random(&mut rng);
    let _ = with_indicator(&mut view, language, lookup).await;
    println!("{}\n", render::view(&controller.view(), language));

    loop {
        let prompt = Text::new(message)
            .with_autocomplete(suggester.clone())
            .with_help_message(help);
        let input = match prompt.prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        match input.trim() {
            "" => continue,
            QUIT_COMMAND => break,
            RANDOM_COMMAND => {
                let lookup = controller.random(&mut rng);
                let _ = with_indicator(&mut view, language, lookup).await;
            }
            city => {
                let lookup = controller.search(city);
                let _ = with_indicator(&mut view, language, lookup).await;
            }
        }

        println!("{}\n", render::view(&controller.view(), language));
    }

    Ok(())
}
