use std::env;

use uuid::Uuid;

use rigdesk_storage::objects::{self, FsObjectStore};

fn temp_store() -> FsObjectStore {
	FsObjectStore::new(env::temp_dir().join(format!("rigdesk_objects_{}", Uuid::new_v4().simple())))
}

#[tokio::test]
async fn overwrite_replaces_existing_object() {
	let store = temp_store();

	assert!(store.put("static/app.css", b"v1", true).await.expect("Failed to put object."));
	assert!(store.put("static/app.css", b"v2", true).await.expect("Failed to put object."));
	assert_eq!(
		store.get("static/app.css").await.expect("Failed to read object."),
		Some(b"v2".to_vec())
	);

	let _ = std::fs::remove_dir_all(store.root());
}

#[tokio::test]
async fn create_only_keeps_first_object() {
	let store = temp_store();

	assert!(store.put("media/a.png", b"first", false).await.expect("Failed to put object."));
	assert!(!store.put("media/a.png", b"second", false).await.expect("Failed to put object."));
	assert_eq!(
		store.get("media/a.png").await.expect("Failed to read object."),
		Some(b"first".to_vec())
	);

	let _ = std::fs::remove_dir_all(store.root());
}

#[tokio::test]
async fn delete_reports_whether_object_existed() {
	let store = temp_store();

	store.put("media/b.txt", b"x", false).await.expect("Failed to put object.");

	assert!(store.exists("media/b.txt").await.expect("Failed to stat object."));
	assert!(store.delete("media/b.txt").await.expect("Failed to delete object."));
	assert!(!store.delete("media/b.txt").await.expect("Failed to delete object."));
	assert_eq!(store.get("media/b.txt").await.expect("Failed to read object."), None);

	let _ = std::fs::remove_dir_all(store.root());
}

#[test]
fn keys_cannot_escape_the_root() {
	for key in ["", "../etc/passwd", "/abs/path", "media/../../x", "media/", "./a"] {
		assert!(objects::validate_key(key).is_err(), "{key}");
	}
	assert!(objects::validate_key("media/users/profile_images/me.png").is_ok());
}
