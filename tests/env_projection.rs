use ccswitch::config::{Profile, ProfileEnv};
use ccswitch::launch::{build_spawn_params, project_env};

fn profile_with(env: ProfileEnv) -> Profile {
    Profile {
        name: "p".to_string(),
        description: String::new(),
        env,
        extra: Default::default(),
    }
}

#[test]
fn projects_only_present_keys() {
    let profile = profile_with(ProfileEnv {
        base_url: Some("https://api.example.com".to_string()),
        auth_token: Some("sk-1".to_string()),
        model: None,
        ..ProfileEnv::default()
    });

    let env = project_env(&profile);
    assert_eq!(
        env,
        vec![
            ("ANTHROPIC_BASE_URL".to_string(), "https://api.example.com".to_string()),
            ("ANTHROPIC_AUTH_TOKEN".to_string(), "sk-1".to_string()),
        ]
    );
}

#[test]
fn empty_string_is_a_value() {
    let profile = profile_with(ProfileEnv {
        model: Some(String::new()),
        ..ProfileEnv::default()
    });

    assert_eq!(
        project_env(&profile),
        vec![("ANTHROPIC_MODEL".to_string(), String::new())]
    );
}

#[test]
fn missing_env_container_projects_nothing() {
    let profile: Profile =
        serde_json::from_value(serde_json::json!({"name": "broken", "description": ""})).unwrap();
    assert!(project_env(&profile).is_empty());
}

#[test]
fn spawn_params_carry_profile_env() {
    let profile = profile_with(ProfileEnv {
        base_url: Some("https://api.example.com".to_string()),
        auth_token: Some("t".to_string()),
        model: Some("opus".to_string()),
        ..ProfileEnv::default()
    });
    let params = build_spawn_params(
        "claude".to_string(),
        vec!["--continue".to_string()],
        &profile,
    );

    assert_eq!(params.args, vec!["--continue"]);
    assert_eq!(params.env.len(), 3);
    assert_eq!(params.env[2], ("ANTHROPIC_MODEL".to_string(), "opus".to_string()));
}
