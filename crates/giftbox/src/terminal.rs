//! Terminal presentation of the flow.
//!
//! Renders the current stage as text and turns typed lines into flow
//! events. Decoded codes come from the scan capability; everything else
//! comes from the input channel.

use anyhow::{Context, Result};
use giftbox_common::{CelebrationMessage, ConfirmStage, FlowState, GiftboxError};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;

use crate::flow::{FlowController, FlowEvent, Stage};
use crate::quiz::QuizEngine;
use crate::scan::ScanCapability;

/// Typed line that leaves the flow from any stage
const QUIT: &str = ":q";

/// What a typed line means in the current state
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(FlowEvent),
    RetryCapture,
    Quit,
    Ignore,
}

fn interpret(state: FlowState, line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed == QUIT {
        return Input::Quit;
    }

    match state {
        FlowState::Scan => Input::RetryCapture,
        FlowState::Quiz => Input::Event(FlowEvent::SubmitAnswer(line.to_string())),
        FlowState::Confirm => match trimmed.to_lowercase().as_str() {
            "y" | "yes" | "opened" => Input::Event(FlowEvent::Confirm),
            "n" | "no" | "not yet" => Input::Event(FlowEvent::Decline),
            _ => Input::Ignore,
        },
        FlowState::Celebrate => Input::Ignore,
    }
}

/// Text view of a stage
pub fn render_stage(
    stage: &Stage,
    celebration: &[CelebrationMessage],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    match stage {
        Stage::Scan { error } => render_scan(&mut out, error.as_deref())?,
        Stage::Quiz(quiz) => render_quiz(&mut out, quiz)?,
        Stage::Confirm { unlock_pin, stage } => render_confirm(&mut out, unlock_pin, *stage)?,
        Stage::Celebrate => render_celebration(&mut out, celebration)?,
    }

    Ok(out)
}

fn render_scan(out: &mut String, error: Option<&str>) -> std::fmt::Result {
    writeln!(out, "== Unlock the padlock PIN ==")?;
    writeln!(out, "Scan the code to begin your surprise.")?;
    if let Some(message) = error {
        writeln!(out, "! {message}")?;
    }
    writeln!(out, "(Enter retries the camera, {QUIT} quits)")
}

fn render_quiz(out: &mut String, quiz: &QuizEngine) -> std::fmt::Result {
    let progress = quiz.progress();
    let question = quiz.current_question();

    // Solved puzzles as '*', the current one as 'o', the rest as '.'
    let marks: String = (0..quiz.question_count())
        .map(|i| match i.cmp(&quiz.answered()) {
            std::cmp::Ordering::Less => '*',
            std::cmp::Ordering::Equal => 'o',
            std::cmp::Ordering::Greater => '.',
        })
        .collect();

    writeln!(
        out,
        "== Puzzle {} of {} [{marks}] ==",
        progress.current_index + 1,
        quiz.question_count()
    )?;
    writeln!(out, "{}", question.question)?;
    if !question.hint.is_empty() {
        writeln!(out, "Hint: {}", question.hint)?;
    }
    if let Some(message) = &progress.error_message {
        writeln!(out, "! {message}")?;
    }
    write!(out, "Your answer: ")
}

fn render_confirm(out: &mut String, unlock_pin: &str, stage: ConfirmStage) -> std::fmt::Result {
    writeln!(out, "== All puzzles solved! ==")?;
    writeln!(out, "Padlock PIN: {unlock_pin}")?;
    writeln!(out, "Use this PIN to open the padlock on the bag.")?;
    match stage {
        ConfirmStage::Asking => write!(out, "Have you opened the gift? [y]es / [n]ot yet: "),
        ConfirmStage::Waiting => {
            writeln!(out, "Take your time and open it first.")?;
            write!(out, "Type y once the gift is open: ")
        }
    }
}

fn render_celebration(out: &mut String, messages: &[CelebrationMessage]) -> std::fmt::Result {
    writeln!(out, "*** Surprise! ***")?;
    for message in messages {
        writeln!(out)?;
        writeln!(out, "-- {} --", message.title)?;
        writeln!(out, "{}", message.body)?;
    }
    Ok(())
}

fn render<W: Write>(out: &mut W, stage: &Stage, celebration: &[CelebrationMessage]) -> Result<()> {
    writeln!(out)?;
    write!(out, "{}", render_stage(stage, celebration)?)?;
    out.flush().context("Failed to write view")
}

/// Start decoding; a failure is reported to the flow and yields no channel
fn start_capture(
    controller: &FlowController,
    scanner: &mut dyn ScanCapability,
) -> Option<mpsc::Receiver<String>> {
    match scanner.start() {
        Ok(rx) => Some(rx),
        Err(e) => {
            if !e.is_retryable() {
                tracing::error!(error = %e, "Scanner failed to start");
            }
            let reason = match e {
                GiftboxError::CaptureUnavailable(reason) => reason,
                other => other.to_string(),
            };
            controller.handle(FlowEvent::CaptureUnavailable(reason));
            None
        }
    }
}

async fn next_decoded(decoded: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match decoded {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Run one session until it reaches `Celebrate`, the guest quits, or
/// input closes. Returns the state the session ended in.
pub async fn run<W: Write>(
    controller: &FlowController,
    mut scanner: Box<dyn ScanCapability>,
    mut input: mpsc::Receiver<String>,
    celebration: &[CelebrationMessage],
    out: &mut W,
) -> Result<FlowState> {
    let mut views = controller.subscribe();
    let mut decoded = start_capture(controller, scanner.as_mut());
    render(out, &views.borrow_and_update(), celebration)?;

    while !controller.state().is_terminal() {
        tokio::select! {
            code = next_decoded(&mut decoded) => match code {
                Some(text) => {
                    controller.handle(FlowEvent::Decoded(text));
                }
                None => {
                    decoded = None;
                    scanner.stop();
                    controller.handle(FlowEvent::CaptureUnavailable(
                        "the decoder stopped delivering codes".to_string(),
                    ));
                }
            },
            line = input.recv() => {
                let Some(line) = line else {
                    tracing::info!("Input closed, leaving the flow");
                    break;
                };
                match interpret(controller.state(), &line) {
                    Input::Quit => break,
                    Input::Event(event) => {
                        controller.handle(event);
                        // A repeated wrong answer leaves the stage as it was
                        if !views.has_changed()? {
                            render(out, &views.borrow(), celebration)?;
                        }
                    }
                    Input::RetryCapture => {
                        controller.handle(FlowEvent::DismissError);
                        if decoded.is_none() {
                            decoded = start_capture(controller, scanner.as_mut());
                        }
                    }
                    Input::Ignore => {
                        render(out, &views.borrow(), celebration)?;
                    }
                }
            }
        }

        if controller.state() != FlowState::Scan && scanner.is_active() {
            scanner.stop();
            decoded = None;
        }

        if views.has_changed()? {
            render(out, &views.borrow_and_update(), celebration)?;
        }
    }

    scanner.stop();
    Ok(controller.state())
}

/// Feed stdin lines into a channel from a dedicated thread
pub fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    rx
}
