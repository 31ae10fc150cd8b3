//! Prompt settings, custom texts and partials.

mod common;

use common::{ctx, management, transport};
use idm_management::RequestOptions;
use idm_management::managers::{CustomText, Prompt, PromptPartials};
use serde_json::json;

#[tokio::test]
async fn test_update_and_revert_prompt_settings() {
    let transport = transport().await;
    transport
        .seed(
            "prompts",
            json!({"universal_login_experience": "classic", "identifier_first": false, "webauthn_platform_first_factor": false}),
        )
        .await;
    let management = management(&transport);
    let prompts = management.prompt();
    let ctx = ctx("prompt");
    let options = RequestOptions::new();

    let original = prompts.read(&ctx, &options).await.unwrap();

    let mut change = Prompt {
        universal_login_experience: Some("new".to_string()),
        identifier_first: Some(true),
        ..Prompt::default()
    };
    prompts.update(&ctx, &mut change, &options).await.unwrap();
    assert_eq!(
        transport.last_request().await.unwrap().body,
        Some(json!({"universal_login_experience": "new", "identifier_first": true}))
    );
    // Settings left out of the update are read back too.
    assert_eq!(change.webauthn_platform_first_factor, Some(false));

    let read = prompts.read(&ctx, &options).await.unwrap();
    assert_eq!(read.universal_login_experience(), "new");
    assert!(read.identifier_first());

    let mut revert = original.clone();
    prompts.update(&ctx, &mut revert, &options).await.unwrap();
    assert_eq!(prompts.read(&ctx, &options).await.unwrap(), original);
}

#[tokio::test]
async fn test_explicit_false_reaches_the_api() {
    let transport = transport().await;
    transport
        .seed("prompts", json!({"identifier_first": true}))
        .await;
    let management = management(&transport);
    let prompts = management.prompt();
    let ctx = ctx("prompt-false");

    let mut change = Prompt {
        identifier_first: Some(false),
        ..Prompt::default()
    };
    prompts
        .update(&ctx, &mut change, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(
        transport.document("prompts").await,
        Some(json!({"identifier_first": false}))
    );
}

#[tokio::test]
async fn test_custom_text_round_trip() {
    let transport = transport().await;
    let management = management(&transport);
    let prompts = management.prompt();
    let ctx = ctx("prompt-text");
    let options = RequestOptions::new();

    let mut texts = CustomText::new();
    texts.insert("login".to_string(), json!({"title": "Welcome"}));
    prompts
        .set_custom_text(&ctx, "login", "en", &texts, &options)
        .await
        .unwrap();
    assert_eq!(
        transport.last_request().await.unwrap().path,
        "prompts/login/custom-text/en"
    );

    let read = prompts.custom_text(&ctx, "login", "en", &options).await.unwrap();
    assert_eq!(read, texts);

    // An empty map removes every customization.
    prompts
        .set_custom_text(&ctx, "login", "en", &CustomText::new(), &options)
        .await
        .unwrap();
    let cleared = prompts.custom_text(&ctx, "login", "en", &options).await.unwrap();
    assert!(cleared.is_empty());
}

#[tokio::test]
async fn test_partials_round_trip() {
    let transport = transport().await;
    let management = management(&transport);
    let prompts = management.prompt();
    let ctx = ctx("partials");
    let options = RequestOptions::new();

    let mut partials = PromptPartials::new();
    partials.insert(
        "login".to_string(),
        json!({"form-content-end": "<div>Need help? Contact support.</div>"}),
    );
    prompts
        .set_partials(&ctx, "login", &partials, &options)
        .await
        .unwrap();

    let read = prompts.partials(&ctx, "login", &options).await.unwrap();
    assert_eq!(
        read["login"]["form-content-end"],
        "<div>Need help? Contact support.</div>"
    );
}

#[tokio::test]
async fn test_unknown_prompt_text_is_not_found() {
    let transport = transport().await;
    let management = management(&transport);

    let error = management
        .prompt()
        .custom_text(&ctx("missing"), "signup", "fr", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(error.is_not_found());
}
