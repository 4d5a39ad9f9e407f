//! End-to-end sample workflow: form entry, storage, editing, dashboard views

use soil_health_core::{
    export_csv, DashboardStats, JsonFileRepository, MarkerLayer, MarkerPatch, Municipality,
    SampleDraft, SampleRepository, SampleService, SampleUpdate, ServiceError, SessionContext,
    UserId, UserSession,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("soil_health_core=debug")
        .with_test_writer()
        .try_init();
}

fn filled_draft(municipality: Municipality, place: &str, temperature: &str) -> SampleDraft {
    let mut draft = SampleDraft::new();
    draft
        .set_municipality(municipality)
        .set_location(place, municipality.center());
    draft.set_temperature(temperature);
    draft.set_nitrogen("0.2");
    draft
}

#[test]
fn test_form_to_store_to_dashboard() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.json");

    let session = SessionContext::signed_in(UserSession::new(UserId::new("maria"), "Maria Santos"));
    let service = SampleService::new(JsonFileRepository::open(&path).unwrap(), session.clone());

    let mut draft = filled_draft(Municipality::Bucay, "Bucay North", "28");
    assert_eq!(draft.ph_text(), "5.9");
    assert_eq!(draft.fertility_text(), "69");
    let first = service.submit(&draft).unwrap();
    draft.reset();

    // pH typed over the derived value is kept as entered
    let mut draft = filled_draft(Municipality::Sallapadan, "Sallapadan Ridge", "22");
    draft.set_ph("6.9");
    let second = service.submit(&draft).unwrap();

    let stored = service.samples().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(*stored[1].ph, 6.9);
    assert_eq!(stored[0].point_scale.value(), 4);

    let mut layer = MarkerLayer::new();
    let viewer = session.current_user();
    let patches = layer.reconcile(&stored, viewer.as_ref());
    assert_eq!(patches.len(), 2);
    assert!(layer.markers().iter().all(|m| m.editable));

    // Raising the temperature moves only the point scale
    let edited = service
        .edit(
            first,
            &SampleUpdate {
                temperature: Some(soil_health_core::Celsius::try_new(37.0).unwrap()),
                ..SampleUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(edited.point_scale.value(), 2);
    assert_eq!(*edited.ph, 5.9);

    session.sign_out();
    assert!(matches!(service.remove(second), Err(ServiceError::NotSignedIn)));

    let reopened = JsonFileRepository::open(&path).unwrap();
    let samples = reopened.list_all().unwrap();
    assert_eq!(samples.len(), 2);

    let patches = layer.reconcile(&samples, None);
    assert_eq!(patches.len(), 2);
    assert!(patches.iter().all(|p| matches!(p, MarkerPatch::Updated(m) if !m.editable)));

    let stats = DashboardStats::from_samples(&samples);
    assert_eq!(stats.sample_count, 2);
    assert_eq!(stats.municipality(Municipality::Bucay).unwrap().count, 1);
    assert_eq!(stats.overall.ph, Some(6.4));

    let mut csv = Vec::new();
    export_csv(&samples, &mut csv).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 3);
}

#[test]
fn test_other_users_cannot_change_samples() {
    init_logging();
    let session = SessionContext::signed_in(UserSession::new(UserId::new("maria"), "Maria"));
    let service = SampleService::new(soil_health_core::InMemoryRepository::new(), session.clone());
    let id = service
        .submit(&filled_draft(Municipality::Lagangilang, "Lagangilang West", "24"))
        .unwrap();

    session.sign_out();
    session.sign_in(UserSession::new(UserId::new("jose"), "Jose"));
    assert!(matches!(service.remove(id), Err(ServiceError::NotOwner(_))));
    assert_eq!(service.samples().unwrap().len(), 1);
}
