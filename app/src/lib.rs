use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use docqa_ai::cohere::CohereClient;
use docqa_ai::llm::cohere_llm::{CohereLlm, GenerationSettings};
use docqa_ai::llm::Llm;
use docqa_ai::session::{error_detail, user_message, AskSettings, Session, SessionView};
use docqa_core::config::{load_config, AppConfig};
use docqa_core::domain::{MediaType, UploadedDocument};
use docqa_core::error::{AppError, SESSION_IO_FAILED, SESSION_UNKNOWN_COMMAND};

const HELP: &str = "\
Commands:
  :open <path>                 load a PDF or text file (type from the extension)
  :open-as <media-type> <path> load a file with an explicit media type
  :clear                       forget the document and the last answer
  :state                       print the current session as JSON
  :help                        show this help
  :quit                        exit
Anything else is asked as a question about the loaded document.";

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub media_type: MediaType,
    pub page_count: usize,
    pub pages_with_text: usize,
    pub char_count: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub answered_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open {
        path: String,
        media_type: Option<String>,
    },
    Clear,
    State,
    Help,
    Quit,
    Ask(String),
    Nothing,
}

pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    if !line.starts_with(':') {
        return Ok(Command::Ask(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    match name {
        ":open" if !rest.is_empty() => Ok(Command::Open {
            path: rest.to_string(),
            media_type: None,
        }),
        ":open-as" => match rest.split_once(char::is_whitespace) {
            Some((media_type, path)) if !path.trim().is_empty() => Ok(Command::Open {
                path: path.trim().to_string(),
                media_type: Some(media_type.to_string()),
            }),
            _ => Err(unknown_command(line)),
        },
        ":clear" => Ok(Command::Clear),
        ":state" => Ok(Command::State),
        ":help" => Ok(Command::Help),
        ":quit" | ":q" | ":exit" => Ok(Command::Quit),
        _ => Err(unknown_command(line)),
    }
}

fn unknown_command(line: &str) -> AppError {
    AppError::new(SESSION_UNKNOWN_COMMAND, "Unknown or incomplete command. Type :help.")
        .with_details(format!("line={line}"))
}

/// Process-lifetime state: the model client, per-question settings and one session.
pub struct App<L: Llm> {
    llm: L,
    ask_settings: AskSettings,
    session: Session,
}

impl App<CohereLlm> {
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let client = CohereClient::new(&config.base_url)?;
        let llm = CohereLlm::new(client, GenerationSettings::from_config(&config));
        Ok(Self::with_llm(&config, llm))
    }
}

impl<L: Llm> App<L> {
    pub fn with_llm(config: &AppConfig, llm: L) -> Self {
        Self {
            llm,
            ask_settings: AskSettings {
                api_key: config.api_key.clone(),
                max_context_chars: config.max_context_chars,
            },
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn upload_document(
        &mut self,
        path: &Path,
        media_type: Option<&str>,
    ) -> Result<UploadResponse, AppError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = AppError::new(SESSION_IO_FAILED, "Failed to read the document file")
                    .with_details(format!("path={}; err={}", path.display(), e));
                self.session.reject_upload(err.clone());
                return Err(err);
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let loaded = self.session.upload(UploadedDocument::new(
            file_name,
            media_type.unwrap_or(""),
            bytes,
        ))?;
        Ok(UploadResponse {
            file_name: loaded.file_name.clone(),
            media_type: loaded.extracted.media_type,
            page_count: loaded.extracted.page_count,
            pages_with_text: loaded.extracted.pages_with_text,
            char_count: loaded.extracted.char_count(),
        })
    }

    pub fn ask_question(&mut self, question: &str) -> Result<AnswerResponse, AppError> {
        let answer = self
            .session
            .ask(&self.llm, &self.ask_settings, question)?
            .to_string();
        let answered_at = self
            .session
            .last_answer()
            .and_then(|a| a.answered_at.clone());
        Ok(AnswerResponse {
            answer,
            answered_at,
        })
    }

    pub fn clear_session(&mut self) -> SessionView {
        self.session.clear();
        self.session.view()
    }

    pub fn session_view(&self) -> SessionView {
        self.session.view()
    }

    /// Execute one line of input. `None` means the user asked to quit.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match parse_command(line) {
            Ok(c) => c,
            Err(e) => return Some(render_error(&e)),
        };
        let out = match command {
            Command::Nothing => String::new(),
            Command::Quit => return None,
            Command::Help => HELP.to_string(),
            Command::Clear => {
                self.clear_session();
                "Session cleared.".to_string()
            }
            Command::State => serde_json::to_string_pretty(&self.session_view())
                .unwrap_or_else(|e| format!("failed to render session: {e}")),
            Command::Open { path, media_type } => {
                match self.upload_document(Path::new(&path), media_type.as_deref()) {
                    Ok(r) => format!(
                        "Loaded {} ({}): {} characters from {} of {} page(s).",
                        r.file_name,
                        r.media_type.as_str(),
                        r.char_count,
                        r.pages_with_text,
                        r.page_count
                    ),
                    Err(e) => render_error(&e),
                }
            }
            Command::Ask(question) => match self.ask_question(&question) {
                Ok(r) => r.answer,
                Err(e) => render_error(&e),
            },
        };
        Some(out)
    }
}

pub fn render_error(err: &AppError) -> String {
    match error_detail(err) {
        Some(detail) => format!("error [{}]: {}\n  {detail}", err.code, user_message(err)),
        None => format!("error [{}]: {}", err.code, user_message(err)),
    }
}

fn repl<L: Llm>(app: &mut App<L>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{HELP}")?;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        match app.handle_line(&line) {
            Some(out) if out.is_empty() => {}
            Some(out) => writeln!(stdout, "{out}")?,
            None => return Ok(()),
        }
    }
}

pub fn run() -> ExitCode {
    // Configuration problems are fatal before any session exists.
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", render_error(&e));
            return ExitCode::from(2);
        }
    };

    if let Err(e) = simple_logger::init_with_level(config.log_level.into()) {
        eprintln!("failed to initialize logging: {e}");
    }
    log::info!("starting with {config:?}");

    let mut app = match App::from_config(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", render_error(&e));
            return ExitCode::from(2);
        }
    };

    match repl(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("terminal i/o failed: {e}");
            ExitCode::FAILURE
        }
    }
}
