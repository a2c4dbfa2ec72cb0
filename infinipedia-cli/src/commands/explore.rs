//! Explore command - interactive exploration loop.
//!
//! Reads commands from stdin while generation runs in the background, so a
//! new topic can be entered before the previous one has finished; the
//! orchestrator discards the superseded results.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use infinipedia_core::{Topic, clickable_words, random_topic, share_url, topic_from_str};
use infinipedia_session::{Epoch, ExplorePhase, ExploreState, ResolveOutcome, TopicOrchestrator};
use infinipedia_store::{Settings, ThemeStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use url::Url;

use super::session::{load_settings, open_kv, open_orchestrator, renderer};
use crate::output::{ExploreOutput, JsonFormatter, Renderer};
use crate::{Cli, OutputFormat};

const HELP: &str = "\
Type a topic to explore it. Quote it (\"r\", \"1984\") to skip the commands.
  <n>      follow word number n (explores <n> itself if there is no such word)
  #<n>     follow word number n
  r        random topic
  h        show history
  h<n>     revisit history entry n
  retry    regenerate the current topic
  s        print a shareable link
  t        toggle light/dark theme
  q        quit";

/// Arguments for the explore command.
#[derive(Args, Default)]
pub struct ExploreArgs {
    /// Initial topic.
    pub topic: Vec<String>,

    /// Start from a shareable link.
    #[arg(long, conflicts_with = "topic")]
    pub url: Option<String>,
}

// ============================================================================
// Input
// ============================================================================

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Nothing,
    /// Leave the loop.
    Quit,
    /// Explore a random topic.
    Random,
    /// Regenerate the current topic.
    Retry,
    /// List history.
    History,
    /// Revisit the n-th history entry (1-based).
    Revisit(usize),
    /// Follow the n-th word of the current definition (1-based).
    Word(usize),
    /// A bare number: the n-th word if there is one, otherwise a topic.
    Number(usize, String),
    /// Toggle the theme.
    Theme,
    /// Print a shareable link.
    Share,
    /// Show the command list.
    Help,
    /// Explore free text.
    Topic(String),
}

/// Parses one line of input.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Some(quoted) = line
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return Input::Topic(quoted.to_string());
    }

    match line.to_lowercase().as_str() {
        "" => Input::Nothing,
        "q" | "quit" | "exit" => Input::Quit,
        "r" | "random" => Input::Random,
        "retry" => Input::Retry,
        "h" | "history" => Input::History,
        "t" | "theme" => Input::Theme,
        "s" | "share" => Input::Share,
        "?" | "help" => Input::Help,
        lower => {
            if let Some(n) = lower.strip_prefix('h').and_then(parse_index) {
                Input::Revisit(n)
            } else if let Some(n) = lower.strip_prefix('#').and_then(parse_index) {
                Input::Word(n)
            } else if let Some(n) = parse_index(lower) {
                Input::Number(n, line.to_string())
            } else {
                Input::Topic(line.to_string())
            }
        }
    }
}

fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|n| *n > 0)
}

// ============================================================================
// Loop
// ============================================================================

struct Session {
    orchestrator: TopicOrchestrator,
    themes: ThemeStore,
    share_base: Option<Url>,
    renderer: Renderer,
    json: Option<JsonFormatter>,
    last_json: Option<Epoch>,
}

impl Session {
    fn say(&self, text: &str) {
        if self.json.is_none() {
            println!("{text}");
        }
    }

    fn start(&self, outcome: ResolveOutcome) {
        match outcome {
            ResolveOutcome::Started(epoch) => debug!(epoch = epoch.value(), "Started"),
            ResolveOutcome::Unchanged => {
                let current = self.orchestrator.snapshot().topic;
                if let Some(topic) = current {
                    self.say(&self.renderer.formatter().dim(&format!("Already showing \"{topic}\"")));
                }
            }
            ResolveOutcome::Empty => {}
        }
    }

    fn show(&mut self, state: &ExploreState) -> Result<()> {
        if let Some(formatter) = &self.json {
            if state.topic.is_some() && state.is_settled() && self.last_json != Some(state.epoch) {
                self.last_json = Some(state.epoch);
                println!("{}", formatter.format(&ExploreOutput::from_state(state, false))?);
            }
            return Ok(());
        }

        let text = self.renderer.render(state);
        if !text.is_empty() {
            let mut stdout = std::io::stdout();
            stdout.write_all(text.as_bytes())?;
            if self.renderer.is_finished() {
                stdout.write_all(b"\n> ")?;
            }
            stdout.flush()?;
        }
        Ok(())
    }

    /// Handles one command. Returns false to quit.
    fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Nothing => {}
            Input::Quit => return false,
            Input::Help => self.say(HELP),
            Input::Random => self.start(self.orchestrator.resolve_topic(random_topic())),
            Input::Retry => self.start(self.orchestrator.reload()),
            Input::Topic(text) => self.start(self.orchestrator.resolve(&text)),
            Input::History => {
                let entries = self.orchestrator.context().history().entries();
                self.say(&self.renderer.formatter().format_history(&entries));
            }
            Input::Revisit(n) => match self.orchestrator.context().history().get(n - 1) {
                Some(topic) => self.start(self.orchestrator.resolve_topic(topic)),
                None => self.say(&format!("No history entry h{n}")),
            },
            Input::Word(n) => match self.pick_word(n) {
                Some(word) => self.start(self.orchestrator.resolve_topic(word)),
                None => self.say(&format!("No word number {n}")),
            },
            Input::Number(n, text) => match self.pick_word(n) {
                Some(word) => self.start(self.orchestrator.resolve_topic(word)),
                None => self.start(self.orchestrator.resolve(&text)),
            },
            Input::Theme => {
                let theme = self.themes.toggle();
                self.renderer.formatter_mut().set_theme(theme);
                self.say(&format!("Theme: {theme}"));
            }
            Input::Share => self.share(),
        }
        true
    }

    fn pick_word(&self, n: usize) -> Option<Topic> {
        let state = self.orchestrator.snapshot();
        if state.phase() != ExplorePhase::Complete {
            return None;
        }
        clickable_words(&state.content).into_iter().nth(n - 1)
    }

    fn share(&self) {
        let Some(topic) = self.orchestrator.snapshot().topic else {
            self.say("Nothing to share yet");
            return;
        };
        match &self.share_base {
            Some(base) => self.say(share_url(base, &topic).as_str()),
            None => self.say("The configured share base URL is invalid"),
        }
    }
}

fn initial_topic(args: &ExploreArgs) -> Result<Option<Topic>> {
    if let Some(url) = &args.url {
        return match topic_from_str(url) {
            Some(topic) => Ok(Some(topic)),
            None => bail!("No topic found in {url}"),
        };
    }
    Ok(Topic::parse(args.topic.join(" ")))
}

fn share_base(settings: &Settings) -> Option<Url> {
    Url::parse(&settings.share_base_url).ok()
}

/// Runs the explore command.
pub async fn run(args: &ExploreArgs, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?.get().await;
    let orchestrator = open_orchestrator(&settings)?;
    let themes = ThemeStore::new(open_kv(&settings));
    let theme = themes.get();

    let mut session = Session {
        orchestrator,
        themes,
        share_base: share_base(&settings),
        renderer: renderer(cli, theme),
        json: (cli.format == OutputFormat::Json).then(|| JsonFormatter::new(cli.pretty)),
        last_json: None,
    };

    let mut rx = session.orchestrator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match initial_topic(args)? {
        Some(topic) => session.start(session.orchestrator.resolve_topic(topic)),
        None => {
            session.say(HELP);
            if session.json.is_none() {
                print!("\n> ");
                std::io::stdout().flush()?;
            }
        }
    }

    let mut stdin_open = true;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                changed?;
                let state = rx.borrow_and_update().clone();
                session.show(&state)?;
                if !stdin_open && state.is_settled() {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !session.handle(parse_input(&line)) {
                            break;
                        }
                    }
                    // Input closed: finish the current topic, then leave.
                    None => {
                        stdin_open = false;
                        if session.orchestrator.snapshot().is_settled() {
                            break;
                        }
                    }
                }
            }
        }
    }

    session.orchestrator.shutdown();
    info!("Explore session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("   "), Input::Nothing);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("QUIT"), Input::Quit);
        assert_eq!(parse_input("r"), Input::Random);
        assert_eq!(parse_input("retry"), Input::Retry);
        assert_eq!(parse_input("h"), Input::History);
        assert_eq!(parse_input("h3"), Input::Revisit(3));
        assert_eq!(parse_input(" 12 "), Input::Number(12, "12".into()));
        assert_eq!(parse_input("#12"), Input::Word(12));
        assert_eq!(parse_input("t"), Input::Theme);
        assert_eq!(parse_input("s"), Input::Share);
    }

    #[test]
    fn test_parse_topics() {
        assert_eq!(parse_input(" Black Hole "), Input::Topic("Black Hole".into()));
        assert_eq!(parse_input("hydrogen"), Input::Topic("hydrogen".into()));
        assert_eq!(parse_input("h2o"), Input::Topic("h2o".into()));
        assert_eq!(parse_input("0"), Input::Topic("0".into()));
        assert_eq!(parse_input("h0"), Input::Topic("h0".into()));
        assert_eq!(parse_input("1984"), Input::Number(1984, "1984".into()));
        assert_eq!(parse_input("#0"), Input::Topic("#0".into()));
    }

    #[test]
    fn test_quoted_text_is_always_a_topic() {
        assert_eq!(parse_input(r#""r""#), Input::Topic("r".into()));
        assert_eq!(parse_input(r#" "1984" "#), Input::Topic("1984".into()));
        assert_eq!(parse_input(r#""h2""#), Input::Topic("h2".into()));
        assert_eq!(parse_input(r#""""#), Input::Topic(String::new()));
    }

    #[test]
    fn test_initial_topic_from_url() {
        let args = ExploreArgs {
            topic: Vec::new(),
            url: Some("https://infinipedia.app/?topic=Black%20Hole".into()),
        };
        assert_eq!(initial_topic(&args).unwrap().unwrap().as_str(), "Black Hole");

        let args = ExploreArgs {
            topic: vec!["Black".into(), "Hole".into()],
            url: None,
        };
        assert_eq!(initial_topic(&args).unwrap().unwrap().as_str(), "Black Hole");

        assert!(initial_topic(&ExploreArgs::default()).unwrap().is_none());

        let args = ExploreArgs {
            topic: Vec::new(),
            url: Some("https://infinipedia.app/".into()),
        };
        assert!(initial_topic(&args).is_err());
    }
}
