//! Connect against real vault trees on disk

use linkvault_vault::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A small vault mirroring the usual shapes: nested folders, a duplicated
/// note name, media, canvas files and an app settings folder.
fn create_stub_vault() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "Sussudio.md",
        "---\ntitle: Sussudio\ntags: [song]\n---\n\
         #y1982 #music\n\n\
         A song by [[Phil Collins]].\n\n\
         ![[Sussudio.mp3]]\n\
         ![[1999.flac]]\n",
    );
    write(
        root,
        "Brevissima.md",
        "[[Alimenta]] and again [[alimenta#Second part|the second part]]\n\n\
         See [the other note](lipsum/Ne%20fuit.md).\n",
    );
    write(root, "Isolated note.md", "No links here. #lonely\n");
    write(root, "lipsum/Isolated note.md", "Nor here.\n");
    write(
        root,
        "lipsum/Alimenta.md",
        "[[Vulnera ubera]] [[Brevissima]]\n\n![[Sussudio]]\n![[Crazy wall.canvas]]\n",
    );
    write(
        root,
        "lipsum/Ne fuit.md",
        "[[Alimenta]] [[Causam mihi]] [[Tarpeia]]\n\n```\n[[Not a link]]\n```\n",
    );
    write(root, "attachments/cover.png", "png");
    write(root, "Crazy wall.canvas", "{\"nodes\":[]}");
    write(root, "Crazy wall 2.canvas", "{\"nodes\":[]}");
    write(root, ".obsidian/app.md", "[[Ignored]]");

    temp_dir
}

fn connect(root: &Path, attachments: bool) -> Vault {
    let config = ConnectConfig::builder(root)
        .attachments(attachments)
        .build()
        .unwrap();
    Vault::connect(config).unwrap()
}

#[test]
fn test_file_universe() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), true);

    let identities: Vec<&str> = vault
        .file_universe()
        .entries()
        .iter()
        .map(|e| e.identity.as_str())
        .collect();
    assert_eq!(
        identities,
        vec![
            "Brevissima",
            "Crazy wall 2.canvas",
            "Crazy wall.canvas",
            "Isolated note",
            "Sussudio",
            "cover.png",
            "Alimenta",
            "lipsum/Isolated note",
            "Ne fuit",
        ]
    );
}

#[test]
fn test_backlinks() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), false);

    assert_eq!(
        vault.backlink_counts("Alimenta").unwrap(),
        BTreeMap::from([("Brevissima".to_string(), 2), ("Ne fuit".to_string(), 1)])
    );
    assert_eq!(
        vault.backlinks("Alimenta").unwrap(),
        vec!["Brevissima", "Brevissima", "Ne fuit"]
    );
    assert_eq!(
        vault.backlink_counts("Phil Collins").unwrap(),
        BTreeMap::from([("Sussudio".to_string(), 1)])
    );
    assert!(matches!(
        vault.backlink_counts("Ignored"),
        Err(Error::UnknownIdentity { .. })
    ));
}

#[test]
fn test_isolation() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), false);

    assert_eq!(
        vault.isolated_notes(),
        vec!["Isolated note", "lipsum/Isolated note"]
    );
    assert_eq!(vault.isolated_canvas_files(), vec!["Crazy wall 2.canvas"]);
}

#[test]
fn test_note_contents() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), false);

    assert_eq!(
        vault.wikilinks("Ne fuit").unwrap(),
        ["Alimenta", "Causam mihi", "Tarpeia"]
    );
    assert_eq!(vault.tags("Sussudio").unwrap(), ["y1982", "music", "song"]);
    assert_eq!(
        vault.markdown_links("Brevissima").unwrap(),
        ["lipsum/Ne%20fuit.md"]
    );
    let fm = vault.front_matter("Sussudio").unwrap().unwrap();
    assert_eq!(fm.data["title"], "Sussudio");
    assert!(vault.front_matter("Brevissima").unwrap().is_none());
    assert!(matches!(
        vault.wikilinks("Crazy wall.canvas"),
        Err(Error::NotANote { .. })
    ));
}

#[test]
fn test_nonexistent_targets() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), true);

    assert_eq!(
        vault.nonexistent_notes(),
        vec!["Phil Collins", "Vulnera ubera", "Causam mihi", "Tarpeia"]
    );
    assert_eq!(
        vault.nonexistent_media_files(),
        vec!["Sussudio.mp3", "1999.flac"]
    );
    assert!(vault.nonexistent_canvas_files().is_empty());

    let media = vault.media_metadata();
    let mp3 = media.iter().find(|row| row.identity == "Sussudio.mp3").unwrap();
    assert!(!mp3.exists);
    assert_eq!(mp3.backlink_count, 1);
    let cover = media.iter().find(|row| row.identity == "cover.png").unwrap();
    assert!(cover.exists);
    assert_eq!(cover.backlink_count, 0);
    assert_eq!(
        cover.relative_path,
        Some(PathBuf::from("attachments").join("cover.png"))
    );
}

#[test]
fn test_attachments_off() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), false);

    assert!(vault.media_metadata().is_empty());
    assert!(vault.nonexistent_media_files().is_empty());
    assert!(vault.file_universe().get("cover.png").is_none());

    let sussudio = vault
        .note_metadata()
        .into_iter()
        .find(|row| row.identity == "Sussudio")
        .unwrap();
    assert_eq!(sussudio.embedded_file_count, Some(2));
    assert_eq!(sussudio.tag_count, Some(3));
}

#[test]
fn test_note_metadata_missing_versus_zero() {
    let temp_dir = create_stub_vault();
    let vault = connect(temp_dir.path(), false);
    let rows = vault.note_metadata();

    for row in &rows {
        if row.exists {
            assert!(row.wikilink_count.is_some(), "{} was scanned", row.identity);
            assert!(row.tag_count.is_some());
            assert!(row.embedded_file_count.is_some());
            assert!(row.modified_time.is_some());
            let path = row.absolute_path.as_ref().unwrap();
            assert!(path.starts_with(temp_dir.path()) || path.is_absolute());
        } else {
            assert_eq!(row.wikilink_count, None);
            assert_eq!(row.tag_count, None);
            assert_eq!(row.embedded_file_count, None);
            assert_eq!(row.modified_time, None);
            assert_eq!(row.relative_path, None);
        }
    }

    let isolated = rows.iter().find(|r| r.identity == "Isolated note").unwrap();
    assert_eq!(isolated.wikilink_count, Some(0));
    assert_eq!(isolated.tag_count, Some(1));
}

#[test]
fn test_connect_twice_is_identical() {
    let temp_dir = create_stub_vault();
    let first = connect(temp_dir.path(), true);
    let second = connect(temp_dir.path(), true);

    assert_eq!(first.note_metadata(), second.note_metadata());
    assert_eq!(first.media_metadata(), second.media_metadata());
    assert_eq!(first.canvas_metadata(), second.canvas_metadata());
    assert_eq!(first.backlinks_index(), second.backlinks_index());
}

#[test]
fn test_dotted_titles_and_heading_anchors() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "Reading.md",
        "# Top\n\n[[Node.js]] [[Chapter 3.5]] [[#Top]] [back](#top) #js\n",
    );
    write(root, "tools/build.js", "console.log('not a vault file')");

    for attachments in [false, true] {
        let vault = connect(root, attachments);
        assert_eq!(vault.nonexistent_notes(), vec!["Node.js", "Chapter 3.5"]);
        assert!(vault.nonexistent_media_files().is_empty());
        assert_eq!(
            vault.backlink_counts("Node.js").unwrap(),
            BTreeMap::from([("Reading".to_string(), 1)])
        );
        assert!(vault.file_universe().get("build.js").is_none());

        let reading = vault
            .note_metadata()
            .into_iter()
            .find(|row| row.identity == "Reading")
            .unwrap();
        assert_eq!(reading.tag_count, Some(1));
        assert_eq!(reading.wikilink_count, Some(2));
    }
}

#[cfg(unix)]
#[test]
fn test_broken_link_aborts_connect_when_following() {
    let temp_dir = create_stub_vault();
    std::os::unix::fs::symlink(
        temp_dir.path().join("gone.md"),
        temp_dir.path().join("Broken.md"),
    )
    .unwrap();

    // Not following: the dangling symlink is not a file and is skipped
    let vault = connect(temp_dir.path(), false);
    assert!(vault.file_universe().get("Broken").is_none());

    let config = ConnectConfig::builder(temp_dir.path())
        .follow_links(true)
        .build()
        .unwrap();
    match Vault::connect(config) {
        Err(err) => {
            let path = err.path().expect("error names the failing path");
            assert!(path.ends_with("Broken.md"));
        }
        Ok(_) => panic!("connect should fail on an unreadable entry"),
    }
}
