//! Tests for providers, messages and provider types.

use llm_balancer::providers::roles;
use llm_balancer::{create_provider, ClaudeProvider, Message, OpenAIProvider, Provider, ProviderType};

// ============================================================================
// ProviderType Conversion Tests
// ============================================================================

#[test]
fn test_provider_type_from_str() {
    assert_eq!(ProviderType::from("claude"), ProviderType::Claude);
    assert_eq!(ProviderType::from("Anthropic"), ProviderType::Claude);
    assert_eq!(ProviderType::from("OPENAI"), ProviderType::OpenAI);
    assert_eq!(ProviderType::from("gpt"), ProviderType::OpenAI);
}

#[test]
#[should_panic(expected = "Unknown provider type")]
fn test_provider_type_from_str_unknown() {
    let _ = ProviderType::from("unknown_provider");
}

#[test]
fn test_provider_type_parse_unknown_is_error() {
    assert!(ProviderType::parse("mistral").is_err());
}

#[test]
fn test_provider_type_display() {
    assert_eq!(format!("{}", ProviderType::Claude), "Claude");
    assert_eq!(format!("{}", ProviderType::OpenAI), "OpenAI");
}

// ============================================================================
// Message Tests
// ============================================================================

#[test]
fn test_message_helpers() {
    assert_eq!(Message::system("a").role(), roles::SYSTEM);
    assert_eq!(Message::user("b").role(), roles::USER);
    assert_eq!(Message::assistant("c").role(), roles::ASSISTANT);
    assert_eq!(Message::user("b").content(), "b");
}

#[test]
fn test_message_unknown_role_passes_through() {
    let message = Message::new("tool", "");
    assert_eq!(message.role(), "tool");
    assert_eq!(message.content(), "");
    assert!(message.has_valid_role());
    assert!(!Message::new("  ", "x").has_valid_role());
}

// ============================================================================
// Claude Provider Tests
// ============================================================================

#[test]
fn test_claude_exposes_system_as_leading_message() {
    let provider = ClaudeProvider::new(
        "claude-v1",
        Some("You are a helpful assistant.".to_string()),
        vec![Message::user("Hello from Claude!")],
    ).unwrap();

    assert_eq!(provider.get_model(), "claude-v1");
    assert_eq!(provider.provider_type(), ProviderType::Claude);
    assert_eq!(
        provider.get_messages().to_vec(),
        vec![Message::system("You are a helpful assistant."), Message::user("Hello from Claude!")]
    );
    assert_eq!(provider.turns().len(), 1);
}

#[test]
fn test_claude_from_messages_lifts_leading_system() {
    let provider = ClaudeProvider::from_messages("claude-v1", vec![
        Message::system("be brief"),
        Message::user("hi"),
        Message::system("not lifted"),
    ]).unwrap();

    assert_eq!(provider.system(), Some("be brief"));
    assert_eq!(provider.turns().len(), 2);
    assert_eq!(provider.get_messages().len(), 3);
    assert_eq!(provider.get_messages()[0], Message::system("be brief"));
}

#[test]
fn test_claude_without_system() {
    let provider = ClaudeProvider::new("claude-v1", None, vec![Message::user("hi")]).unwrap();
    assert_eq!(provider.get_messages().to_vec(), vec![Message::user("hi")]);
}

// ============================================================================
// OpenAI Provider Tests
// ============================================================================

#[test]
fn test_openai_messages_unchanged() {
    let messages = vec![
        Message::system("You are a helpful assistant."),
        Message::user("Hello from OpenAI!"),
        Message::new("custom-role", "kept"),
    ];
    let provider = OpenAIProvider::new("gpt-3.5-turbo", messages.clone()).unwrap();

    assert_eq!(provider.get_model(), "gpt-3.5-turbo");
    assert_eq!(provider.provider_type(), ProviderType::OpenAI);
    assert_eq!(provider.get_messages().to_vec(), messages);
    // reading twice yields the same sequence
    assert_eq!(provider.get_messages().to_vec(), messages);
}

// ============================================================================
// Validation and Factory Tests
// ============================================================================

#[test]
fn test_empty_model_rejected() {
    assert!(OpenAIProvider::new("", vec![]).is_err());
    assert!(ClaudeProvider::new("   ", None, vec![]).is_err());
}

#[test]
fn test_empty_role_rejected() {
    let err = OpenAIProvider::new("gpt-4", vec![Message::new("", "orphan")]).unwrap_err();
    assert!(err.to_string().contains("role"));
}

#[test]
fn test_create_provider() {
    let claude = create_provider(ProviderType::Claude, "claude-v1", vec![
        Message::system("sys"),
        Message::user("hi"),
    ]).unwrap();
    assert_eq!(claude.provider_type(), ProviderType::Claude);
    assert_eq!(claude.get_messages()[0], Message::system("sys"));

    let openai = create_provider(ProviderType::OpenAI, "gpt-4", vec![Message::user("hi")]).unwrap();
    assert_eq!(openai.get_model(), "gpt-4");
}
