use std::fs;

use once_cell::sync::Lazy;
use tempfile::tempdir;

use qrseal_core::codec::{self, EncryptedPayload};
use qrseal_core::keys::{
    ClearOutcome, Confirmation, FileKeyStore, InitOutcome, KeyManager, KeyOrigin, KeyPair,
    KeyStore, MemoryKeyStore, KEY_BITS,
};
use qrseal_core::qr::{render_png, DEFAULT_QR_SIZE};
use qrseal_core::{QrsealError, Settings, Workflow};

static ALICE: Lazy<KeyPair> =
    Lazy::new(|| KeyPair::generate(KEY_BITS).expect("key generation should succeed"));
static BOB: Lazy<KeyPair> =
    Lazy::new(|| KeyPair::generate(KEY_BITS).expect("key generation should succeed"));

fn workflow_with(pair: &KeyPair) -> Workflow<MemoryKeyStore> {
    let mut keys = KeyManager::new(MemoryKeyStore::new());
    keys.import(&pair.export_text())
        .expect("import should succeed");
    Workflow::new(keys, Settings::default())
}

#[test]
fn test_generate_seal_render_upload_open() {
    let key_dir = tempdir().expect("tempdir should succeed");
    let image_dir = tempdir().expect("tempdir should succeed");

    let mut keys = KeyManager::new(FileKeyStore::new(key_dir.path()));
    keys.generate().expect("generate should succeed");
    let mut workflow = Workflow::new(keys, Settings::default());

    let sealed = workflow
        .seal("hello world", None)
        .expect("seal should succeed");
    assert_eq!(sealed.key_origin, KeyOrigin::Existing);
    assert!(sealed.qr.width() >= DEFAULT_QR_SIZE);

    let path = image_dir.path().join("message.png");
    sealed.qr.save(&path).expect("saving QR image should succeed");

    let plaintext = workflow
        .open_upload(&path)
        .expect("open_upload should succeed");
    assert_eq!(plaintext, "hello world");
    assert_eq!(workflow.last_plaintext(), Some("hello world"));
}

#[test]
fn test_round_trip_unicode_and_empty() {
    for message in ["", "Grüße, 世界 🔐", "line one\nline two"] {
        let payload = codec::encrypt(message, ALICE.public_pem()).expect("encrypt should succeed");
        let opened = codec::decrypt(&payload, ALICE.private_pem()).expect("decrypt should succeed");
        assert_eq!(opened, message);
    }
}

#[test]
fn test_wrong_key_fails_to_decrypt() {
    let payload = codec::encrypt("for alice only", ALICE.public_pem()).expect("encrypt should succeed");
    let err = codec::decrypt(&payload, BOB.private_pem()).unwrap_err();
    assert!(matches!(err, QrsealError::DecryptionFailed));
}

#[test]
fn test_oversized_message_rejected() {
    let message = "x".repeat(215);
    let err = codec::encrypt(&message, ALICE.public_pem()).unwrap_err();
    assert!(matches!(
        err,
        QrsealError::PayloadTooLarge { len: 215, max: 214 }
    ));

    let at_limit = "x".repeat(214);
    assert!(codec::encrypt(&at_limit, ALICE.public_pem()).is_ok());
}

#[test]
fn test_clear_then_use_reports_missing_keys() {
    let key_dir = tempdir().expect("tempdir should succeed");
    let store = FileKeyStore::new(key_dir.path());
    let mut keys = KeyManager::new(store.clone());
    keys.import(&ALICE.export_text()).expect("import should succeed");
    let payload = codec::encrypt("before clear", ALICE.public_pem()).expect("encrypt should succeed");

    let outcome = keys.clear(Confirmation::Confirmed).expect("clear should succeed");
    assert_eq!(outcome, ClearOutcome::Cleared);
    assert!(!store.public_path().exists());
    assert!(!store.private_path().exists());
    assert!(store.load().expect("load should succeed").is_none());

    let mut workflow = Workflow::new(keys, Settings::default());
    let err = workflow.open_payload(payload.as_str()).unwrap_err();
    assert!(matches!(err, QrsealError::NoKeyAvailable));
}

#[test]
fn test_seal_without_keys_generates_and_flags_it() {
    let mut workflow = Workflow::new(KeyManager::new(MemoryKeyStore::new()), Settings::default());
    let sealed = workflow.seal("surprise", None).expect("seal should succeed");
    assert_eq!(sealed.key_origin, KeyOrigin::AutoGenerated);
    assert!(workflow.keys().has_private_key());

    let opened = workflow
        .open_payload(sealed.payload.as_str())
        .expect("open should succeed");
    assert_eq!(opened, "surprise");
}

#[test]
fn test_upload_without_symbol_keeps_previous_plaintext() {
    let dir = tempdir().expect("tempdir should succeed");
    let mut workflow = workflow_with(&ALICE);

    let payload = codec::encrypt("first", ALICE.public_pem()).expect("encrypt should succeed");
    workflow.open_payload(payload.as_str()).expect("open should succeed");

    let blank = dir.path().join("blank.png");
    image::GrayImage::from_pixel(200, 200, image::Luma([255]))
        .save(&blank)
        .expect("saving blank image should succeed");

    let err = workflow.open_upload(&blank).unwrap_err();
    assert!(matches!(err, QrsealError::QrNotFound));
    assert_eq!(workflow.last_plaintext(), Some("first"));
}

#[test]
fn test_scanned_payload_with_line_breaks_opens() {
    let dir = tempdir().expect("tempdir should succeed");
    let mut workflow = workflow_with(&ALICE);

    let payload = codec::encrypt("wrapped", ALICE.public_pem()).expect("encrypt should succeed");
    let wrapped: String = payload
        .as_str()
        .as_bytes()
        .chunks(64)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(EncryptedPayload::from_text(&wrapped), payload);

    let path = dir.path().join("wrapped.png");
    render_png(payload.as_str(), DEFAULT_QR_SIZE, &path).expect("render should succeed");
    assert_eq!(workflow.open_upload(&path).expect("open should succeed"), "wrapped");
}

#[test]
fn test_initialize_loads_or_generates() {
    let key_dir = tempdir().expect("tempdir should succeed");

    let mut first = KeyManager::new(FileKeyStore::new(key_dir.path()));
    assert_eq!(
        first.initialize().expect("initialize should succeed"),
        InitOutcome::Generated
    );
    let fingerprint = first.pair().expect("pair should be loaded").fingerprint();

    let mut second = KeyManager::new(FileKeyStore::new(key_dir.path()));
    assert_eq!(
        second.initialize().expect("initialize should succeed"),
        InitOutcome::Loaded
    );
    assert_eq!(
        second.pair().expect("pair should be loaded").fingerprint(),
        fingerprint
    );
}

#[test]
fn test_import_rejects_mismatched_halves() {
    let key_dir = tempdir().expect("tempdir should succeed");
    let mut keys = KeyManager::new(FileKeyStore::new(key_dir.path()));
    keys.import(&ALICE.export_text()).expect("import should succeed");

    let mixed = format!(
        "Public Key:\n{}\n\nPrivate Key:\n{}",
        ALICE.public_pem(),
        BOB.private_pem()
    );
    let err = keys.import(&mixed).unwrap_err();
    assert!(matches!(err, QrsealError::InvalidKey(_)));

    // The previous pair is still loaded and still on disk.
    assert_eq!(
        keys.public_key().expect("public key should be loaded"),
        ALICE.public_pem()
    );
    let on_disk = fs::read_to_string(key_dir.path().join("public.pem")).expect("read should succeed");
    assert_eq!(on_disk, ALICE.public_pem());
}

#[test]
fn test_export_import_round_trip_across_stores() {
    let key_dir = tempdir().expect("tempdir should succeed");
    let export_path = key_dir.path().join("RSA_Keys.txt");
    fs::write(&export_path, ALICE.export_text()).expect("write should succeed");

    let text = fs::read_to_string(&export_path).expect("read should succeed");
    let mut keys = KeyManager::new(MemoryKeyStore::new());
    let imported = keys.import(&text).expect("import should succeed");
    assert_eq!(imported.fingerprint(), ALICE.fingerprint());
    assert!(keys.store().has_residue());
}
