// ../tests/tests.rs
use umigame::commands::{NO_ACTIVE_ROUND, format_reply};
use umigame::console::parse_line;
use umigame::prompts::{ANSWER_MARKER, QUESTION_MARKER};
use umigame::transcript::{decode, encode};
use umigame::*;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn test_decode_of_encoded_turns_keeps_non_empty_lines() {
    let turns = vec![
        Turn::puzzle("男はレストランでウミガメのスープを注文した。"),
        Turn::question("男は一人でしたか？"),
        Turn::response("はい"),
        Turn::response("補足です。\n\nスープは温かかった。"),
    ];

    let transcript = decode(&encode(&turns));

    assert_eq!(
        transcript.all_lines(),
        vec![
            "男はレストランでウミガメのスープを注文した。",
            "質問: 男は一人でしたか？",
            "はい",
            "補足です。",
            "スープは温かかった。",
        ]
    );
}

#[test]
fn test_decode_of_empty_input_is_empty() {
    assert!(decode(&encode(&[])).is_empty());
    assert!(decode("").is_empty());
    assert!(decode("\n\n  \n").is_empty());
    assert_eq!(decode("").len(), 0);
}

#[test]
fn test_decode_drops_blank_lines_without_moving_the_puzzle() {
    let transcript = decode("\n\nPUZZLE\r\n\n質問: Q1\nA1\n");

    assert_eq!(transcript.puzzle(), Some("PUZZLE"));
    assert_eq!(transcript.lines(), lines(&["質問: Q1", "A1"]).as_slice());
}

#[test]
fn test_puzzle_turn_is_folded_to_one_line() {
    let turn = Turn::puzzle("  一行目\n\n二行目  \n");

    assert_eq!(turn.kind, TurnKind::Puzzle);
    assert_eq!(turn.text, "一行目 二行目");
}

#[test]
fn test_player_turns_carry_their_marker() {
    assert_eq!(Turn::question("Q1").text, format!("{QUESTION_MARKER}Q1"));
    assert_eq!(Turn::answer("A\nB").text, format!("{ANSWER_MARKER}A B"));
    assert_eq!(Turn::question("Q1").kind, TurnKind::Question);
    assert_eq!(Turn::answer("A").kind, TurnKind::Answer);
}

#[test]
fn test_transcript_push_appends_in_order() {
    let mut transcript = Transcript::new(Turn::puzzle("PUZZLE"));
    transcript.push(Turn::question("Q1"));
    transcript.push(Turn::response("A1"));

    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.encode(), "PUZZLE\n質問: Q1\nA1");
}

#[test]
fn test_builder_reconstructs_alternating_dialogue() {
    let builder = MarkerConversationBuilder::new([QUESTION_MARKER]);
    let transcript = decode("PUZZLE\n質問: Q1\nA1");

    let messages = builder.build("SYSTEM", &transcript, "質問: Q2");

    assert_eq!(
        messages,
        vec![
            ConversationMessage::system("SYSTEM"),
            ConversationMessage::assistant("PUZZLE"),
            ConversationMessage::user("質問: Q1"),
            ConversationMessage::assistant("A1"),
            ConversationMessage::user("質問: Q2"),
        ]
    );
}

#[test]
fn test_builder_joins_response_continuation_lines() {
    let builder = MarkerConversationBuilder::default();
    let transcript = decode("PUZZLE\n質問: Q1\nA1 first\nA1 second\nHINT\n質問: Q2\nA2");

    let messages = builder.build("SYSTEM", &transcript, "質問: Q3");
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();

    assert_eq!(
        roles,
        vec![
            Role::System,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
        ]
    );
    assert_eq!(messages[3].content, "A1 first\nA1 second\nHINT");
    assert_eq!(messages[5].content, "A2");
}

#[test]
fn test_builder_with_puzzle_only_appends_utterance() {
    let builder = MarkerConversationBuilder::default();
    let transcript = decode("PUZZLE");

    let messages = builder.build("SYSTEM", &transcript, "ヒントをください");

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], ConversationMessage::assistant("PUZZLE"));
    assert_eq!(messages[2], ConversationMessage::user("ヒントをください"));
}

#[test]
fn test_builder_treats_answer_lines_as_player_lines() {
    let builder = MarkerConversationBuilder::default();
    let transcript = decode("PUZZLE\n回答: 毒だった\n不正解です");

    let messages = builder.build("SYSTEM", &transcript, "回答: 事故だった");

    assert_eq!(messages[2], ConversationMessage::user("回答: 毒だった"));
    assert_eq!(messages[3], ConversationMessage::assistant("不正解です"));
}

#[test]
fn test_builder_hint_lines_before_any_question_are_assistant() {
    let builder = MarkerConversationBuilder::default();

    let messages = builder.dialogue(&lines(&["HINT1", "HINT2", "質問: Q1", "A1"]));

    assert_eq!(
        messages,
        vec![
            ConversationMessage::assistant("HINT1\nHINT2"),
            ConversationMessage::user("質問: Q1"),
            ConversationMessage::assistant("A1"),
        ]
    );
}

#[test]
fn test_builder_consecutive_questions_stay_separate() {
    let builder = MarkerConversationBuilder::default();

    let messages = builder.dialogue(&lines(&["質問: Q1", "質問: Q2", "A2"]));

    assert_eq!(
        messages,
        vec![
            ConversationMessage::user("質問: Q1"),
            ConversationMessage::user("質問: Q2"),
            ConversationMessage::assistant("A2"),
        ]
    );
}

#[test]
fn test_builder_matches_marker_before_trimming_line_end() {
    let builder = MarkerConversationBuilder::default();

    let messages = builder.dialogue(&lines(&["質問: ", "わからない", "質問: Q2"]));

    assert_eq!(
        messages,
        vec![
            ConversationMessage::user("質問:"),
            ConversationMessage::assistant("わからない"),
            ConversationMessage::user("質問: Q2"),
        ]
    );
}

#[test]
fn test_judgment_negative_token_anywhere_is_incorrect() {
    assert!(!Judgment::classify("不正解です。").is_correct);
    assert!(!Judgment::classify("残念ながら不正解。正解に近いですが").is_correct);
}

#[test]
fn test_judgment_without_negative_token_is_correct() {
    assert!(Judgment::classify("正解です！").is_correct);
    assert!(Judgment::classify("よく分かりましたね").is_correct);
    assert!(Judgment::classify("").is_correct);

    let judgment = Judgment::classify("正解");
    assert_eq!(judgment.raw_text, "正解");
}

#[test]
fn test_command_table_lookup() {
    let table = CommandTable::default();

    assert_eq!(table.lookup("q"), Some(Command::Ask));
    assert_eq!(table.lookup("clue"), Some(Command::Hint));
    assert_eq!(table.lookup("giveup"), Some(Command::GiveUp));
    assert_eq!(table.lookup("unknown"), None);
    assert_eq!(table.names().len(), 9);
}

#[test]
fn test_custom_command_table() {
    let table = CommandTable::builder()
        .command("ask", Command::Ask)
        .command("hint", Command::Hint)
        .build();

    assert_eq!(table.lookup("ask"), Some(Command::Ask));
    assert_eq!(table.lookup("q"), None);
    assert_eq!(table.names(), vec!["ask", "hint"]);
}

#[test]
fn test_format_reply() {
    assert_eq!(format_reply(&Reply::NoActiveRound), NO_ACTIVE_ROUND);
    assert_eq!(
        format_reply(&Reply::Answered {
            question: "男は一人でしたか？".to_string(),
            response: " はい\n".to_string(),
        }),
        "**質問**: 男は一人でしたか？\n\n**回答**: はい"
    );
    assert_eq!(
        format_reply(&Reply::Hint {
            hint: "スープに注目".to_string()
        }),
        "**ヒント**: スープに注目"
    );
}

#[test]
fn test_parse_console_lines() {
    let parsed = parse_line("/q 男は一人でしたか？").expect("command line");
    assert_eq!(parsed.scope, None);
    assert_eq!(parsed.name, "q");
    assert_eq!(parsed.argument, "男は一人でしたか？");

    let parsed = parse_line("#general /create").expect("scoped command line");
    assert_eq!(parsed.scope, Some("general"));
    assert_eq!(parsed.name, "create");
    assert_eq!(parsed.argument, "");

    assert!(parse_line("hello").is_none());
    assert!(parse_line("/").is_none());
    assert!(parse_line("#general").is_none());
}

#[test]
fn test_settings_round_trip_through_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        model: "gpt-4o".to_string(),
        scope: "channel-1".to_string(),
        ..Settings::default()
    };
    settings.save_to_file(&path).expect("save settings");

    let loaded = Settings::load_settings_from_file(&path).expect("load settings");
    assert_eq!(loaded, settings);
}

#[test]
fn test_settings_missing_fields_use_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "model": "gpt-4o-mini" }"#).expect("write settings");

    let loaded = Settings::load_settings_from_file(&path).expect("load settings");
    assert_eq!(loaded.model, "gpt-4o-mini");
    assert_eq!(loaded.scope, "console");
    assert_eq!(loaded.openai_api_key, None);
}

#[test]
fn test_settings_overrides_ignore_blank_values() {
    let settings = Settings::default()
        .with_overrides(Some("sk-test".to_string()), Some("  ".to_string()));

    assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
    assert_eq!(settings.model, "gpt-4-turbo");
}

#[test]
fn test_prompt_set_falls_back_for_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("onClue.txt"), "カスタムヒント").expect("write prompt");

    let prompts = PromptSet::load_from_dir(dir.path());

    assert_eq!(prompts.hint, "カスタムヒント");
    assert_eq!(prompts.puzzle, PromptSet::default().puzzle);
}

#[test]
fn test_completion_first_content() {
    assert_eq!(
        Completion::from_text("はい").first_content().expect("content"),
        "はい"
    );
    assert!(matches!(
        Completion::default().first_content(),
        Err(CompletionError::EmptyChoices)
    ));
    assert!(matches!(
        Completion::from_text("  ").first_content(),
        Err(CompletionError::EmptyContent)
    ));
}

#[tokio::test]
async fn test_console_delivery_tags_scope() {
    use umigame::console::ConsoleDelivery;

    let delivery = ConsoleDelivery::new("general", Vec::<u8>::new());
    delivery.respond("質問を処理しています...").await.expect("respond");
    delivery.follow_up("**回答**: はい").await.expect("follow up");

    let written = String::from_utf8(delivery.into_inner()).expect("utf8");
    assert_eq!(
        written,
        "[general] 質問を処理しています...\n[general] **回答**: はい\n"
    );
}
