//! Interactive session
//!
//! Reads commands from stdin, turns them into intents for the controller
//! and drains status updates pushed by the transport in the same loop.

use crate::error::{CliError, Result};
use cadence_core::{LastPlayedStore, PlaybackPrimitive, PlaybackStatus};
use cadence_playback::{Intent, PlaybackContext, PlaybackController, StatusUpdates, TransportButton};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  list            show the library
  select <n>      play, pause or switch to track n (1-based)
  toggle          play/pause the current track
  next | prev     move through the library
  seek <f>        jump to fraction f (0.0-1.0) of the current track
  status          show what is playing
  quit            exit";

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplCommand {
    List,
    Select(usize),
    Toggle,
    Next,
    Prev,
    Seek(f64),
    Status,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();

        let parsed = match command.as_str() {
            "list" | "ls" => ReplCommand::List,
            "select" | "s" => {
                let n = argument
                    .ok_or_else(|| CliError::command("select needs a track number"))?
                    .parse::<usize>()
                    .map_err(|_| CliError::command("track number must be a positive integer"))?;
                if n == 0 {
                    return Err(CliError::NoSuchTrack(0));
                }
                ReplCommand::Select(n)
            }
            "toggle" | "t" | "play" | "pause" => ReplCommand::Toggle,
            "next" | "n" => ReplCommand::Next,
            "prev" | "p" => ReplCommand::Prev,
            "seek" => {
                let fraction = argument
                    .ok_or_else(|| CliError::command("seek needs a fraction"))?
                    .parse::<f64>()
                    .map_err(|_| CliError::command("fraction must be a number"))?;
                ReplCommand::Seek(fraction)
            }
            "status" | "st" => ReplCommand::Status,
            "help" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            other => return Err(CliError::command(format!("unknown command '{other}'"))),
        };

        if words.next().is_some() {
            return Err(CliError::command(format!("too many arguments for {command}")));
        }
        Ok(parsed)
    }
}

impl ReplCommand {
    /// Intent for commands that drive playback
    pub fn intent(self, context: &PlaybackContext) -> Result<Option<Intent>> {
        let intent = match self {
            ReplCommand::Select(n) => {
                let track = n
                    .checked_sub(1)
                    .and_then(|i| context.audio_files.get(i))
                    .cloned()
                    .ok_or(CliError::NoSuchTrack(n))?;
                Intent::select(track)
            }
            ReplCommand::Toggle => TransportButton::for_playback(context.is_playing)
                .intent(context)
                .ok_or(CliError::NothingSelected)?,
            ReplCommand::Next => Intent::Next,
            ReplCommand::Prev => Intent::Previous,
            ReplCommand::Seek(fraction) => Intent::Seek { fraction },
            ReplCommand::List | ReplCommand::Status | ReplCommand::Help | ReplCommand::Quit => {
                return Ok(None)
            }
        };
        Ok(Some(intent))
    }
}

/// Interactive player over a controller and its status feed
pub struct Session<P, S> {
    controller: PlaybackController<P, S>,
    status_rx: StatusUpdates,
    context: PlaybackContext,
}

impl<P, S> Session<P, S>
where
    P: PlaybackPrimitive,
    S: LastPlayedStore,
{
    pub fn new(
        controller: PlaybackController<P, S>,
        status_rx: StatusUpdates,
        context: PlaybackContext,
    ) -> Self {
        Self {
            controller,
            status_rx,
            context,
        }
    }

    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    /// Run until `quit` or end of input
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ReplCommand>() {
                        Ok(ReplCommand::Quit) => break,
                        Ok(command) => self.handle(command).await,
                        Err(e) => println!("{e}"),
                    }
                }
                Some(status) = self.status_rx.recv() => {
                    self.sync(status).await;
                }
            }
        }

        Ok(())
    }

    /// Execute one command, printing the outcome
    pub async fn handle(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::List => println!("{}", render_library(&self.context)),
            ReplCommand::Status => println!("{}", render_status(&self.context)),
            ReplCommand::Help => println!("{HELP}"),
            _ => match command.intent(&self.context) {
                Ok(Some(intent)) => self.apply(intent).await,
                Ok(None) => {}
                Err(e) => println!("{e}"),
            },
        }
    }

    async fn apply(&mut self, intent: Intent) {
        debug!("Dispatching {:?}", intent);
        match self.controller.dispatch(&self.context, intent).await {
            Ok(Some(next)) => {
                self.context = next;
                println!("{}", render_status(&self.context));
            }
            Ok(None) => println!("Nothing to do"),
            // Already logged by the controller
            Err(e) => println!("Error: {e}"),
        }
    }

    async fn sync(&mut self, status: PlaybackStatus) {
        let previous = self.context.current_audio_index;
        match self.controller.on_status(&self.context, status).await {
            Ok(Some(next)) => {
                let advanced = next.current_audio_index != previous;
                self.context = next;
                if advanced {
                    println!("{}", render_status(&self.context));
                }
            }
            Ok(None) => {}
            Err(e) => println!("Error: {e}"),
        }
    }
}

/// Numbered library listing, current track marked
pub fn render_library(context: &PlaybackContext) -> String {
    if context.audio_files.is_empty() {
        return "Library is empty".to_string();
    }
    context
        .audio_files
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if context.current_audio_index == Some(i) {
                '>'
            } else {
                ' '
            };
            format!("{marker} {:>3}. {}", i + 1, track.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line transport summary
pub fn render_status(context: &PlaybackContext) -> String {
    let Some(track) = &context.current_audio else {
        return "Stopped".to_string();
    };
    let state = if context.is_playing {
        "Playing"
    } else {
        "Paused"
    };
    let position = context
        .sound_obj
        .map(|status| status.position_millis)
        .or(context.playback_position)
        .or(track.last_position)
        .unwrap_or(0);
    let duration = context
        .known_duration()
        .map_or_else(|| "--:--".to_string(), format_millis);
    format!(
        "{state}: {} [{} / {}]",
        track.title,
        format_millis(position),
        duration
    )
}

fn format_millis(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_transport::VirtualTransport;
    use cadence_core::{NoopStore, Track};
    use cadence_playback::PlayerConfig;
    use std::time::Duration;

    fn library() -> PlaybackContext {
        PlaybackContext::new(vec![
            Track::new("a", "file:///music/a.mp3"),
            Track::new("b", "file:///music/b.mp3"),
        ])
    }

    #[test]
    fn parses_commands() {
        assert_eq!("list".parse::<ReplCommand>().unwrap(), ReplCommand::List);
        assert_eq!(
            "select 2".parse::<ReplCommand>().unwrap(),
            ReplCommand::Select(2)
        );
        assert_eq!(
            "  SEEK 0.25 ".parse::<ReplCommand>().unwrap(),
            ReplCommand::Seek(0.25)
        );
        assert_eq!("n".parse::<ReplCommand>().unwrap(), ReplCommand::Next);
        assert_eq!("quit".parse::<ReplCommand>().unwrap(), ReplCommand::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert!("select".parse::<ReplCommand>().is_err());
        assert!("select zero".parse::<ReplCommand>().is_err());
        assert!(matches!(
            "select 0".parse::<ReplCommand>(),
            Err(CliError::NoSuchTrack(0))
        ));
        assert!("seek half".parse::<ReplCommand>().is_err());
        assert!("next 2".parse::<ReplCommand>().is_err());
        assert!("dance".parse::<ReplCommand>().is_err());
    }

    #[test]
    fn select_maps_to_one_based_track() {
        let context = library();
        let intent = ReplCommand::Select(2).intent(&context).unwrap().unwrap();
        assert_eq!(intent, Intent::select(context.audio_files[1].clone()));
        assert!(matches!(
            ReplCommand::Select(3).intent(&context),
            Err(CliError::NoSuchTrack(3))
        ));
        assert!(matches!(
            ReplCommand::Select(0).intent(&context),
            Err(CliError::NoSuchTrack(0))
        ));
    }

    #[test]
    fn toggle_needs_a_current_track() {
        let mut context = library();
        assert!(matches!(
            ReplCommand::Toggle.intent(&context),
            Err(CliError::NothingSelected)
        ));

        context.current_audio = Some(context.audio_files[0].clone());
        assert_eq!(
            ReplCommand::Toggle.intent(&context).unwrap(),
            Some(Intent::select(context.audio_files[0].clone()))
        );
        assert_eq!(ReplCommand::Status.intent(&context).unwrap(), None);
    }

    #[test]
    fn renders_status_line() {
        let mut context = library();
        assert_eq!(render_status(&context), "Stopped");

        context.current_audio = Some(context.audio_files[1].clone().with_duration_ms(185_000));
        context.current_audio_index = Some(1);
        context.is_playing = true;
        context.playback_position = Some(61_500);
        assert_eq!(render_status(&context), "Playing: b.mp3 [1:01 / 3:05]");

        let listing = render_library(&context);
        assert!(listing.contains(">   2. b.mp3"));
        assert!(listing.contains("    1. a.mp3"));
    }

    async fn drain(session: &mut Session<VirtualTransport, NoopStore>) {
        while let Some(status) = session.status_rx.try_recv() {
            session.sync(status).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn each_finished_track_advances_once() {
        let mut controller = PlaybackController::new(
            VirtualTransport::new(2_500),
            NoopStore,
            PlayerConfig::default(),
        );
        let status_rx = controller.status_updates();
        let context = PlaybackContext::new(vec![
            Track::new("a", "file:///music/a.mp3"),
            Track::new("b", "file:///music/b.mp3"),
            Track::new("c", "file:///music/c.mp3"),
        ]);
        let mut session = Session::new(controller, status_rx, context);

        session.handle(ReplCommand::Select(1)).await;
        assert_eq!(session.context().current_audio_index, Some(0));

        // a finishes while nobody reads the feed
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        session.handle(ReplCommand::Next).await;
        assert_eq!(session.context().current_audio_index, Some(1));

        // a's queued finish must not move past b
        drain(&mut session).await;
        assert_eq!(session.context().current_audio_index, Some(1));
        assert!(session.context().is_playing);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        drain(&mut session).await;
        let context = session.context();
        assert_eq!(context.current_audio_index, Some(2));
        assert_eq!(
            context.current_audio.as_ref().map(|t| t.title.as_str()),
            Some("c.mp3")
        );
    }
}
