use super::types::{keys, Preferences, Topic};

/// Never ask more than this many questions in one reply
pub const MAX_FOLLOW_UP_QUESTIONS: usize = 2;

/// A question is asked only while every key in `missing` is absent
struct Question {
    missing: &'static [&'static str],
    text: &'static str,
}

const DINING_QUESTIONS: &[Question] = &[
    Question {
        missing: &[keys::CUISINE, keys::DISH],
        text: "What kind of food are you in the mood for? Local Caribbean dishes, seafood, BBQ, or something else?",
    },
    Question {
        missing: &[keys::BUDGET],
        text: "Are you looking for something casual or a more upscale dining experience?",
    },
    Question {
        missing: &[keys::LOCATION],
        text: "Which area would you prefer? Basseterre, Frigate Bay, or somewhere by the beach?",
    },
    Question {
        missing: &[keys::GROUP_SIZE, keys::TIME_OF_DAY],
        text: "How many people will be dining, and is this for breakfast, lunch, or dinner?",
    },
];

const ACCOMMODATION_QUESTIONS: &[Question] = &[
    Question {
        missing: &[keys::ACCOMMODATION_TYPE],
        text: "What type of place do you prefer: an all-inclusive resort, a boutique hotel, or a beachfront property?",
    },
    Question {
        missing: &[keys::BUDGET],
        text: "What's your budget range per night?",
    },
    Question {
        missing: &[keys::LOCATION],
        text: "Would you rather stay near Frigate Bay, in Basseterre, or somewhere quieter?",
    },
    Question {
        missing: &[keys::GROUP_SIZE],
        text: "How many guests will be staying?",
    },
];

const ACTIVITY_QUESTIONS: &[Question] = &[
    Question {
        missing: &[keys::ACTIVITY_TYPE],
        text: "What kind of activities interest you: water sports, cultural sites, adventure, or something relaxing?",
    },
    Question {
        missing: &[keys::LOCATION],
        text: "Is there a particular part of the island you'd like to explore?",
    },
    Question {
        missing: &[keys::GROUP_SIZE],
        text: "Will you be exploring solo, as a couple, or with a group?",
    },
];

// Beaches only fill the shared slots, so every question here gates on one of them
const BEACH_QUESTIONS: &[Question] = &[
    Question {
        missing: &[keys::LOCATION],
        text: "Are you looking for a lively beach like Frigate Bay or somewhere closer to Basseterre?",
    },
    Question {
        missing: &[keys::GROUP_SIZE],
        text: "Who's coming along: just you, a partner, the kids, or a group of friends?",
    },
    Question {
        missing: &[keys::BUDGET],
        text: "Would you like a beach bar with loungers for hire, or is a cheap, no-frills spot fine?",
    },
];

pub const GENERIC_QUESTION: &str = "Could you tell me a bit more about what you're looking for?";

/// Decide whether enough is known to answer instead of asking again
pub fn has_enough_preferences(topic: Option<Topic>, preferences: &Preferences) -> bool {
    let Some(topic) = topic else {
        return false;
    };

    if preferences.is_empty() {
        return false;
    }

    match topic {
        Topic::Dining => preferences.has_any(&[keys::DISH, keys::CUISINE, keys::BUDGET, keys::LOCATION]),
        Topic::Accommodation => {
            preferences.has_any(&[keys::BUDGET, keys::LOCATION, keys::ACCOMMODATION_TYPE])
        }
        Topic::Activities => preferences.has_any(&[keys::ACTIVITY_TYPE, keys::LOCATION]),
        Topic::Beaches | Topic::Safety => true,
    }
}

/// Up to `MAX_FOLLOW_UP_QUESTIONS` questions for the slots still missing, in bank order
pub fn generate_follow_up_questions(topic: Option<Topic>, preferences: &Preferences) -> Vec<String> {
    let bank = match topic {
        Some(Topic::Dining) => DINING_QUESTIONS,
        Some(Topic::Accommodation) => ACCOMMODATION_QUESTIONS,
        Some(Topic::Activities) => ACTIVITY_QUESTIONS,
        Some(Topic::Beaches) => BEACH_QUESTIONS,
        Some(Topic::Safety) | None => return vec![GENERIC_QUESTION.to_string()],
    };

    bank.iter()
        .filter(|question| !preferences.has_any(question.missing))
        .take(MAX_FOLLOW_UP_QUESTIONS)
        .map(|question| question.text.to_string())
        .collect()
}
