use std::time::Duration;

use super::*;

fn sample_catalog() -> Catalog {
    default_album().catalog()
}

#[test]
fn catalog_assigns_dense_one_based_numbers() {
    let catalog = sample_catalog();
    assert_eq!(catalog.len(), 6);
    for (i, track) in catalog.tracks().iter().enumerate() {
        assert_eq!(track.track_number, (i + 1) as u32);
    }
}

#[test]
fn display_prefixes_track_number() {
    let catalog = sample_catalog();
    let first = catalog.get(0).unwrap();
    assert_eq!(
        first.display,
        "01. International Luv (Western Union Mix)"
    );
}

#[test]
fn adjacency_follows_declaration_order_without_wrapping() {
    let catalog = sample_catalog();

    let second = catalog.next_after("international-luv").unwrap();
    assert_eq!(second.id, "urgent-opportunity");

    let first = catalog.previous_before("urgent-opportunity").unwrap();
    assert_eq!(first.id, "international-luv");

    assert!(catalog.next_after("beneficiary-dreams").is_none());
    assert!(catalog.previous_before("international-luv").is_none());
    assert!(catalog.next_after("not-a-track").is_none());
}

#[test]
fn duration_labels_parse_to_seconds() {
    assert_eq!(
        parse_duration_label("3:45"),
        Some(Duration::from_secs(225))
    );
    assert_eq!(parse_duration_label(" 0:07 "), Some(Duration::from_secs(7)));
    assert_eq!(parse_duration_label("12:00"), Some(Duration::from_secs(720)));

    assert_eq!(parse_duration_label("3:7"), None);
    assert_eq!(parse_duration_label("3:61"), None);
    assert_eq!(parse_duration_label("345"), None);
    assert_eq!(parse_duration_label(""), None);
}

#[test]
fn album_file_overrides_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("album.toml");
    std::fs::write(
        &path,
        r#"
title = "Test Album"
artist = "Test Artist"

[[tracks]]
id = "one"
title = "One"
duration = "1:01"

[[tracks]]
id = "two"
title = "Two"
duration = "2:02"
"#,
    )
    .unwrap();

    let album = Album::load(&path).unwrap();
    assert_eq!(album.title, "Test Album");
    let catalog = album.catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(1).unwrap().track_number, 2);
    assert!(catalog.get(0).unwrap().audio_url.is_empty());
}

#[test]
fn album_load_rejects_duplicates_and_empty() {
    let dir = tempfile::tempdir().unwrap();

    let dup = dir.path().join("dup.toml");
    std::fs::write(
        &dup,
        r#"
title = "A"
artist = "B"

[[tracks]]
id = "x"
title = "X"
duration = "1:00"

[[tracks]]
id = "x"
title = "X again"
duration = "1:00"
"#,
    )
    .unwrap();
    assert!(matches!(
        Album::load(&dup),
        Err(AlbumError::DuplicateId(id)) if id == "x"
    ));

    let empty = dir.path().join("empty.toml");
    std::fs::write(&empty, "title = \"A\"\nartist = \"B\"\ntracks = []\n").unwrap();
    assert!(matches!(Album::load(&empty), Err(AlbumError::Empty)));
}
