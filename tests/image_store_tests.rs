// tests/image_store_tests.rs

use quizbank::store::{ImageStore, images::secure_filename};

#[test]
fn secure_filename_strips_paths_and_odd_chars() {
    assert_eq!(secure_filename("cat.png"), "cat.png");
    assert_eq!(secure_filename("My Photo (1).jpg"), "My_Photo_1.jpg");
    assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
    assert_eq!(secure_filename("C:\\Windows\\evil.exe"), "C_Windows_evil.exe");
    assert_eq!(secure_filename(".hidden"), "hidden");
    assert_eq!(secure_filename("..."), "image");
    assert_eq!(secure_filename("日本.png"), "png");
    assert_eq!(secure_filename("café.png"), "caf.png");
}

#[tokio::test]
async fn save_then_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path().join("uploads"));
    store.ensure_root().await.unwrap();

    let name = store.save("diagram.png", b"png-bytes").await.unwrap();
    assert_eq!(name, "diagram.png");
    let path = store.path_of(&name).unwrap();
    assert!(path.exists());
    assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");

    store.delete(&name).await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn colliding_names_get_a_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path());

    let first = store.save("map.jpg", b"one").await.unwrap();
    let second = store.save("map.jpg", b"two").await.unwrap();

    assert_eq!(first, "map.jpg");
    assert_ne!(first, second);
    assert!(second.starts_with("map-"));
    assert!(second.ends_with(".jpg"));

    // The original file is untouched.
    assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"one");
    assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"two");
}

#[tokio::test]
async fn deleting_missing_image_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path());

    store.delete("never-saved.png").await.unwrap();
}

#[tokio::test]
async fn unsafe_names_are_not_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path());

    assert!(store.path_of("../secret.txt").is_none());
    assert!(store.path_of("").is_none());
    // Nothing outside the root is touched.
    store.delete("../secret.txt").await.unwrap();
}
