use crate::error::Result;
use crate::models::prompt::PromptKind;
use crate::services::content_service::ContentService;

pub const STUDENT_SDT_QUESTIONS: [&str; 5] = [
    "What do your parents think about you?",
    "What do your teachers think about you?",
    "What do your friends think about you?",
    "What do you think about yourself?",
    "What would you like to be?",
];

pub const PROFESSIONAL_SDT_QUESTIONS: [&str; 5] = [
    "What do your colleagues think about you?",
    "What does your manager think of you?",
    "What do your subordinates think of you?",
    "What do you think about yourself?",
    "Where do you see yourself in the future?",
];

pub const WAT_WORDS: [&str; 20] = [
    "Success", "Failure", "Leadership", "Challenge", "Family", "Friend", "Enemy", "Love", "Hate",
    "Work", "Play", "Fear", "Courage", "Money", "Health", "Happiness", "Sadness", "Life", "Death",
    "Future",
];

pub const SRT_SCENARIOS: [&str; 10] = [
    "You are walking in a park when you notice a child crying and looking lost. What would you do?",
    "Your friend asks to borrow a significant amount of money. You know they have not repaid previous loans. How would you respond?",
    "You witness a colleague taking credit for your work during a meeting. What would you do?",
    "You find a wallet containing a large sum of money and identification. What actions would you take?",
    "You are offered a promotion that requires relocating to another city, but your family prefers to stay. How would you handle this situation?",
    "You notice a team member struggling with their workload but not asking for help. What would you do?",
    "While shopping, you notice someone shoplifting. How would you react?",
    "You receive an email that appears to be from your bank requesting personal information. What steps would you take?",
    "A friend shares confidential information about another mutual friend. How would you respond?",
    "You're driving and see an accident happen right in front of you. What would you do?",
];

/// Fills every empty collection with the built-in starter content.
pub async fn seed_default_content(content: &ContentService) -> Result<()> {
    let defaults: [(PromptKind, &[&str]); 4] = [
        (PromptKind::SdtStudent, &STUDENT_SDT_QUESTIONS),
        (PromptKind::SdtProfessional, &PROFESSIONAL_SDT_QUESTIONS),
        (PromptKind::Wat, &WAT_WORDS),
        (PromptKind::Srt, &SRT_SCENARIOS),
    ];

    for (kind, texts) in defaults {
        if content.count(kind).await? > 0 {
            continue;
        }
        let outcome = content.merge_texts(kind, texts.iter()).await?;
        tracing::info!(kind = %kind, added = outcome.added.len(), "seeded default content");
    }
    Ok(())
}
