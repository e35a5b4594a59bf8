// src/cli/chat.rs — Interactive REPL

use chrono::{Duration, Local, NaiveDate};

use crate::core::assistant::Assistant;
use crate::core::itinerary::{
    ItinerarySummary, Pace, SavedItinerary, TripRequest, DEFAULT_INTERESTS, KNOWN_INTERESTS,
};
use crate::core::session::SessionState;
use crate::core::types::{ChatTurn, Role};

/// Run the interactive REPL until `/quit` or EOF.
pub async fn run_chat(assistant: &Assistant, model_label: &str) -> anyhow::Result<()> {
    eprintln!(
        "tripmate v{} | {} | type /help for commands\n",
        env!("CARGO_PKG_VERSION"),
        model_label,
    );

    let mut state = assistant.new_session();
    for turn in state.history.iter() {
        println!("{}", format_turn(turn));
    }
    eprintln!("⚠️  Sign in with /login (or create an account with /signup) to start.");

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            state = handle_slash_command(trimmed, state, assistant).await;
            continue;
        }

        // Empty input
        if trimmed.is_empty() {
            continue;
        }

        state.ui.chat_open = true;
        state = match assistant.send_message(state, trimmed).await {
            Ok(state) => {
                if let Some(reply) = state.history.last() {
                    println!("{}", format_turn(reply));
                }
                state
            }
            Err(rejected) => {
                eprintln!("⚠️  {}. Use /login first.", rejected.error);
                rejected.state
            }
        };
    }

    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

async fn handle_slash_command(
    input: &str,
    mut state: SessionState,
    assistant: &Assistant,
) -> SessionState {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/signup" => {
            state.ui.show_signup_form();
            if let Some((email, password)) = ask_credentials(true) {
                match assistant.sign_up(&email, &password).await {
                    Ok(()) => eprintln!("✅ Account created. Sign in with /login."),
                    Err(e) => eprintln!("❌ Sign-up failed: {e}"),
                }
            }
            state.ui.show_login_form();
            state
        }

        "/login" => {
            if let Some(user) = &state.current_user {
                eprintln!("  Already signed in as {}. Use /logout first.", user.email);
                return state;
            }
            let Some((email, password)) = ask_credentials(false) else {
                return state;
            };
            match assistant.sign_in(state, &email, &password).await {
                Ok(state) => {
                    eprintln!("✅ Signed in as {}", email.trim());
                    for turn in state.history.iter() {
                        println!("{}", format_turn(turn));
                    }
                    state
                }
                Err(rejected) => {
                    eprintln!("❌ Sign-in failed: {}", rejected.error);
                    rejected.state
                }
            }
        }

        "/logout" => {
            let state = assistant.sign_out(state);
            eprintln!("  Signed out.");
            state
        }

        "/whoami" => {
            match &state.current_user {
                Some(user) => eprintln!("👤 {}", user.email),
                None => eprintln!("  Not signed in."),
            }
            state
        }

        "/plan" => {
            if !state.is_logged_in() {
                eprintln!("⚠️  Sign in to plan a trip.");
                return state;
            }
            let Some(request) = ask_trip() else {
                return state;
            };
            eprintln!("🔄 Generating itinerary...");
            match assistant.plan_trip(state, &request).await {
                Ok((state, summary)) => {
                    println!("{}", format_itinerary(&summary));
                    state
                }
                Err(rejected) => {
                    eprintln!("⚠️  {}", rejected.error);
                    rejected.state
                }
            }
        }

        "/trip" => {
            match &state.current_itinerary {
                Some(summary) => println!("{}", format_itinerary(summary)),
                None => eprintln!("  No itinerary yet. Use /plan to create one."),
            }
            state
        }

        "/itineraries" => {
            match assistant.saved_itineraries(&state).await {
                Ok(saved) if saved.is_empty() => eprintln!("  No saved itineraries yet."),
                Ok(saved) => {
                    for (i, item) in saved.iter().enumerate() {
                        println!("{}\n", format_saved(i, item));
                    }
                }
                Err(e) => eprintln!("⚠️  {e}"),
            }
            state
        }

        "/history" => {
            eprintln!(
                "  Conversation ({} of {} turns kept):",
                state.history.len(),
                state.history.capacity()
            );
            for turn in state.history.iter() {
                println!("{}", format_turn(turn));
            }
            state
        }

        "/help" => {
            eprintln!("Slash commands:");
            eprintln!("  /signup            Create an account");
            eprintln!("  /login             Sign in and restore your recent chat");
            eprintln!("  /logout            Sign out and clear this session");
            eprintln!("  /whoami            Show the signed-in user");
            eprintln!("  /plan              Generate an itinerary");
            eprintln!("  /trip              Show the current itinerary");
            eprintln!("  /itineraries       Show your saved itineraries");
            eprintln!("  /history           Show the conversation kept in memory");
            eprintln!("  /help              Show this help");
            eprintln!("  /quit, quit, exit  End session");
            eprintln!("Anything else is sent to the assistant.");
            state
        }

        _ => {
            eprintln!("Unknown command: {}. Type /help for commands.", cmd);
            state
        }
    }
}

fn ask_credentials(confirm: bool) -> Option<(String, String)> {
    let email = inquire::Text::new("Email:").prompt_skippable().ok()??;
    let mut prompt = inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked);
    if !confirm {
        prompt = prompt.without_confirmation();
    }
    let password = prompt.prompt_skippable().ok()??;
    Some((email, password))
}

fn ask_date(label: &str, default: NaiveDate) -> Option<NaiveDate> {
    let default = default.format("%Y-%m-%d").to_string();
    let answer = inquire::Text::new(label)
        .with_default(&default)
        .with_help_message("YYYY-MM-DD")
        .with_validator(|s: &str| {
            Ok(match parse_date(s) {
                Some(_) => inquire::validator::Validation::Valid,
                None => inquire::validator::Validation::Invalid("Use YYYY-MM-DD".into()),
            })
        })
        .prompt_skippable()
        .ok()??;
    parse_date(&answer)
}

fn ask_trip() -> Option<TripRequest> {
    let origin = inquire::Text::new("🛫 Origin city:")
        .with_placeholder("e.g., Ho Chi Minh City")
        .prompt_skippable()
        .ok()??;
    let destination = inquire::Text::new("🛬 Destination city:")
        .with_placeholder("e.g., Da Nang")
        .prompt_skippable()
        .ok()??;

    let today = Local::now().date_naive();
    let start_date = ask_date("📅 Start date:", today)?;
    let end_date = ask_date("📅 End date:", start_date + Duration::days(3))?;

    let defaults: Vec<usize> = KNOWN_INTERESTS
        .iter()
        .enumerate()
        .filter(|(_, i)| DEFAULT_INTERESTS.contains(*i))
        .map(|(idx, _)| idx)
        .collect();
    let interests = inquire::MultiSelect::new("🎯 Interests:", KNOWN_INTERESTS.to_vec())
        .with_default(&defaults)
        .prompt_skippable()
        .ok()??;

    let pace = inquire::Select::new("⏱️ Pace:", Pace::ALL.to_vec())
        .with_starting_cursor(1)
        .prompt_skippable()
        .ok()??;

    Some(TripRequest {
        origin,
        destination,
        start_date,
        end_date,
        interests: interests.into_iter().map(String::from).collect(),
        pace,
    })
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn format_turn(turn: &ChatTurn) -> String {
    let who = match turn.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("[{who}] {}", turn.content())
}

pub fn format_itinerary(summary: &ItinerarySummary) -> String {
    let meta = &summary.metadata;
    format!(
        "🗓️  {} → {} | {} → {} | Pace: {}\n\n{}",
        meta.origin, meta.destination, meta.start_date, meta.end_date, meta.pace, summary.content
    )
}

pub fn format_saved(index: usize, saved: &SavedItinerary) -> String {
    let meta = &saved.summary.metadata;
    format!(
        "#{} | {} → {}\n📅 {} | Pace: {}\n{}",
        index + 1,
        meta.origin,
        meta.destination,
        saved.created_at.format("%Y-%m-%d %H:%M UTC"),
        meta.pace,
        saved.summary.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::itinerary::ItineraryMetadata;
    use chrono::{TimeZone, Utc};

    fn summary() -> ItinerarySummary {
        ItinerarySummary {
            content: "Day 1: My Khe beach".into(),
            metadata: ItineraryMetadata {
                origin: "Ho Chi Minh City".into(),
                destination: "Da Nang".into(),
                start_date: "2026-11-01".into(),
                end_date: "2026-11-04".into(),
                interests: vec!["Beach".into()],
                pace: Pace::Relaxed,
            },
        }
    }

    #[test]
    fn test_format_turn() {
        assert_eq!(format_turn(&ChatTurn::user("hi")), "[you] hi");
        assert_eq!(format_turn(&ChatTurn::assistant("hello")), "[assistant] hello");
    }

    #[test]
    fn test_format_itinerary() {
        let out = format_itinerary(&summary());
        assert!(out.contains("Ho Chi Minh City → Da Nang"));
        assert!(out.contains("2026-11-01 → 2026-11-04"));
        assert!(out.contains("Pace: Relaxed"));
        assert!(out.ends_with("Day 1: My Khe beach"));
    }

    #[test]
    fn test_format_saved_is_one_based() {
        let saved = SavedItinerary {
            summary: summary(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap(),
        };
        let out = format_saved(0, &saved);
        assert!(out.starts_with("#1 | Ho Chi Minh City → Da Nang"));
        assert!(out.contains("2026-10-01 08:30 UTC"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2026-02-28 "),
            NaiveDate::from_ymd_opt(2026, 2, 28)
        );
        assert_eq!(parse_date("2026-02-30"), None);
        assert_eq!(parse_date("28/02/2026"), None);
    }
}
