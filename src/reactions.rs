//! Reaction summaries
//!
//! Telegram attaches reaction counters to channel posts; this flattens
//! them into a short human-readable summary string.

use grammers_client::types::Message;
use grammers_tl_types as tl;

/// Extract an optional reaction summary from a message.
///
/// Returns `None` when the platform sent no reactions at all.
pub fn reaction_summary(msg: &Message) -> Option<String> {
    match &msg.raw {
        tl::enums::Message::Message(m) => summarize(m.reactions.as_ref()),
        _ => None,
    }
}

/// Flatten raw reaction counters into `<emoji>x<count>` pairs.
pub fn summarize(reactions: Option<&tl::enums::MessageReactions>) -> Option<String> {
    let reactions = reactions?;
    let tl::enums::MessageReactions::Reactions(reactions) = reactions;

    let mut parts = Vec::new();
    for result in &reactions.results {
        let tl::enums::ReactionCount::Count(count) = result;

        match &count.reaction {
            tl::enums::Reaction::Emoji(emoji) => {
                parts.push(format!("{}x{}", emoji.emoticon, count.count));
            }
            tl::enums::Reaction::CustomEmoji(custom) => {
                parts.push(format!("CustomEmoji({})x{}", custom.document_id, count.count));
            }
            tl::enums::Reaction::Paid => parts.push(format!("💎x{}", count.count)),
            tl::enums::Reaction::Empty => {}
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
