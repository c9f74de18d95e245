use lexai::conversation::{Conversation, Message, SearchInfo};
use lexai::stream::{ResearchEvent, SseDecoder};
use lexai::ui::{ChatSnapshot, render_feed};

fn feed(conversation: &Conversation, streaming: bool) -> String {
    render_feed(ChatSnapshot {
        session_id: "walkthrough".to_string(),
        messages: conversation.messages().to_vec(),
        input: conversation.input().to_string(),
        streaming,
        poll_interval_ms: 750,
    })
}

#[test]
fn test_searching_reply_shows_query_then_typing() {
    let conversation = Conversation::from_messages(vec![
        Message::user(1, "What is adverse possession?"),
        Message::assistant(2, "")
            .loading()
            .with_search_info(SearchInfo::searching("adverse possession")),
    ]);

    let html = feed(&conversation, true);

    let bubble = html.find("justify-end").unwrap();
    let user = html.find("What is adverse possession?").unwrap();
    let searching = html.find("Searching legal sources for").unwrap();
    let typing = html.find("typing-indicator").unwrap();
    assert!(bubble < user && user < searching && searching < typing);
    assert!(html[searching..typing].contains("adverse possession"));
    assert!(!html.contains("Preparing response..."));
    assert!(html.contains("hx-trigger=\"every 750ms\""));
}

#[test]
fn test_decoded_stream_renders_final_answer() {
    let body = concat!(
        "data: {\"type\": \"checkpoint\", \"checkpoint_id\": \"abc\"}\n\n",
        "data: {\"type\": \"search_start\", \"query\": \"statute of frauds\"}\n\n",
        "data: {\"type\": \"search_results\", \"urls\": [",
        "\"https://www.law.cornell.edu/wex/statute_of_frauds\", ",
        "\"https://www.nolo.com/a\", \"https://b.example/x\", ",
        "\"https://c.example/y\", \"https://d.example/z\"]}\n\n",
        "data: {\"type\": \"content\", \"content\": \"Contracts for land \"}\n\n",
        "data: {\"type\": \"content\", \"content\": \"must be in writing.\\nSee the owner\\'s deed.\"}\n\n",
        "data: {\"type\": \"end\"}\n\n",
    );

    let mut conversation = Conversation::new();
    conversation.set_input("Does a land sale need a written contract?");
    let pending = conversation.submit().unwrap();

    let mut decoder = SseDecoder::default();
    // Feed in small uneven chunks, the way a network read would.
    for chunk in body.as_bytes().chunks(7) {
        for event in decoder.push(chunk) {
            conversation.apply(pending.reply_id, event);
        }
    }
    assert!(!conversation.is_streaming());
    assert_eq!(conversation.checkpoint_id(), Some("abc"));

    let html = feed(&conversation, false);
    assert!(html.contains("Searching legal sources for"));
    assert!(html.contains("Found 5 sources"));
    assert_eq!(html.matches("class=\"source-card").count(), 4);
    assert!(html.contains(">law.cornell.edu</span>"));
    assert!(html.contains(">nolo.com</span>"));
    assert!(!html.contains("d.example"));
    assert!(html.contains("Contracts for land must be in writing.\nSee the owner's deed."));
    assert!(!html.contains("typing-indicator"));
    assert!(!html.contains("hx-get"));
}
