//! Structured prompt requests for the donor dialog.
//!
//! When the core needs the donor's self-identification it yields one of these
//! requests and resumes with the externally supplied answer — a plain
//! two-step request/response exchange handled by the embedding application,
//! not a concurrency mechanism. Titles and descriptions carry both languages
//! so the presentation layer can pick at display time.

use serde::Serialize;

/// A short text in every supported language.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedText {
    pub en: &'static str,
    pub nl: &'static str,
}

/// Ask the donor to select their export file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePrompt {
    pub title: LocalizedText,
    pub description: LocalizedText,
    /// Accepted MIME type.
    pub extensions: &'static str,
}

/// Ask the donor to pick one item from a list.
#[derive(Debug, Clone, Serialize)]
pub struct ChoicePrompt {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub items: Vec<String>,
}

/// One request in the donor dialog.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptRequest {
    File(FilePrompt),
    Choice(ChoicePrompt),
}

/// Step 1: ask for the chat export file.
pub fn chat_file_prompt() -> PromptRequest {
    PromptRequest::File(FilePrompt {
        title: LocalizedText {
            en: "Step 1: Select the chat file",
            nl: "Stap 1: Selecteer het chat-bestand",
        },
        description: LocalizedText {
            en: "We previously asked you to export a chat file. Please select \
                 this file so we can extract relevant information for our research.",
            nl: "We hebben u gevraagd een chat-bestand te exporteren. U kunt dit \
                 bestand nu selecteren zodat wij er relevante informatie uit \
                 kunnen halen voor ons onderzoek.",
        },
        extensions: "application/zip",
    })
}

/// Step 2: ask which extracted sender the donor is.
pub fn sender_choice_prompt(candidates: Vec<String>) -> PromptRequest {
    PromptRequest::Choice(ChoicePrompt {
        title: LocalizedText {
            en: "Step 2: Select your username",
            nl: "Stap 2: Selecteer je gebruikersnaam",
        },
        description: LocalizedText {
            en: "The following users are extracted from the chat file. Which one are you?",
            nl: "Geef hieronder aan welke gebruikersnaam van u is. Deze data wordt \
                 niet opgeslagen, maar alleen gebruikt om de juiste informatie uit \
                 uw data te kunnen halen.",
        },
        items: candidates,
    })
}
