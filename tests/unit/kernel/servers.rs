use super::*;

#[test]
fn test_defaults() {
    let state = ServersState::with_defaults(11434);
    let servers = state.servers();
    assert_eq!(servers.len(), 2);
    assert!(servers[0].is_online);
    assert!(!servers[1].is_online);
    assert_eq!(servers[1].address(), "192.168.1.100:11434");
}

#[test]
fn test_add_requires_name_and_host() {
    let mut state = ServersState::new();
    assert_eq!(state.add("  ", "host", 1), Err(ServerError::MissingName));
    assert_eq!(state.add("name", "", 1), Err(ServerError::MissingHost));

    let id = state.add(" gpu ", " 10.0.0.2 ", 8080).unwrap();
    let server = state.get(id).unwrap();
    assert_eq!(server.name, "gpu");
    assert_eq!(server.host, "10.0.0.2");
    assert!(!server.is_online);
}

#[test]
fn test_remove() {
    let mut state = ServersState::with_defaults(11434);
    let id = state.servers()[0].id;

    assert_eq!(state.remove(id).map(|s| s.name), Ok("Local Server".to_string()));
    assert_eq!(state.remove(id), Err(ServerError::NotFound(id)));
    assert_eq!(state.servers().len(), 1);
}

#[test]
fn test_apply_statuses_skips_removed_servers() {
    let mut state = ServersState::with_defaults(11434);
    let first = state.servers()[0].id;
    let second = state.servers()[1].id;
    state.remove(first).unwrap();

    let applied = state.apply_statuses(&[(first, false), (second, true)]);
    assert_eq!(applied, 1);
    assert!(state.get(second).unwrap().is_online);
}

#[test]
fn test_from_settings() {
    let settings = vec![
        ServerSettings {
            name: "a".to_string(),
            host: "h".to_string(),
            port: None,
        },
        ServerSettings {
            name: String::new(),
            host: "h".to_string(),
            port: Some(1),
        },
    ];
    let state = ServersState::from_settings(&settings, 9000);
    assert_eq!(state.servers().len(), 1);
    assert_eq!(state.servers()[0].port, 9000);

    assert_eq!(ServersState::from_settings(&[], 9000).servers().len(), 2);
}
