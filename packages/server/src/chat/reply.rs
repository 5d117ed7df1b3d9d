//! Canned assistant replies chosen by keyword.

use common::ReplyKind;

/// One canned answer and the quick-action buttons shown under it.
#[derive(Debug, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub message: &'static str,
    pub quick_actions: &'static [&'static str],
}

struct Rule {
    keywords: &'static [&'static str],
    reply: Reply,
}

const TOPIC_MENU: &[&str] = &[
    "Technical Support",
    "Billing Help",
    "Service Info",
    "Live Agent",
];

// First matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &[
            "technical",
            "tech",
            "bug",
            "error",
            "issue",
            "problem",
            "broken",
            "not working",
            "down",
            "system",
            "api",
            "integration",
        ],
        reply: Reply {
            kind: ReplyKind::SupportMenu,
            message: "I can help with technical issues. What are you running into?",
            quick_actions: &[
                "System Down",
                "Integration Help",
                "Performance Issues",
                "Create Ticket",
            ],
        },
    },
    Rule {
        keywords: &[
            "billing",
            "payment",
            "invoice",
            "charge",
            "subscription",
            "price",
            "refund",
            "upgrade",
            "account",
            "plan",
        ],
        reply: Reply {
            kind: ReplyKind::SupportMenu,
            message: "I can help with billing and account questions. What do you need?",
            quick_actions: &[
                "View Invoice",
                "Payment Issue",
                "Upgrade Plan",
                "Billing Ticket",
            ],
        },
    },
    Rule {
        keywords: &[
            "service",
            "services",
            "what do you do",
            "features",
            "capabilities",
            "offerings",
            "solutions",
        ],
        reply: Reply {
            kind: ReplyKind::ServiceMenu,
            message: "We build data platforms, AI solutions, analytics and security tooling. Which area interests you?",
            quick_actions: &["Data Engineering", "AI Solutions", "Analytics", "Security"],
        },
    },
    Rule {
        keywords: &[
            "agent",
            "human",
            "person",
            "representative",
            "speak to someone",
            "live chat",
            "talk to someone",
        ],
        reply: Reply {
            kind: ReplyKind::AgentTransfer,
            message: "I will connect you with a member of our team. Please describe your issue while we find someone.",
            quick_actions: &["Describe Issue", "Upload Files", "Cancel Request"],
        },
    },
    Rule {
        keywords: &[
            "hello",
            "hi",
            "hey",
            "good morning",
            "good afternoon",
            "help",
            "support",
            "start",
        ],
        reply: Reply {
            kind: ReplyKind::Welcome,
            message: "Hello! How can we help you today?",
            quick_actions: TOPIC_MENU,
        },
    },
];

static FALLBACK: Reply = Reply {
    kind: ReplyKind::Clarification,
    message: "I am not sure I understood. Could you tell me a bit more, or pick a topic below?",
    quick_actions: TOPIC_MENU,
};

/// Lowercased words separated by single spaces, padded at both ends.
fn words(message: &str) -> String {
    let lowered = message.to_lowercase();
    let joined = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {joined} ")
}

/// Picks the reply for a visitor message. Keywords match whole words or phrases.
pub fn reply_to(message: &str) -> &'static Reply {
    let text = words(message);
    RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| text.contains(&format!(" {keyword} ")))
        })
        .map(|rule| &rule.reply)
        .unwrap_or(&FALLBACK)
}
