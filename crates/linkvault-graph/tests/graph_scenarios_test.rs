//! End-to-end graph scenarios over an in-memory vault

use chrono::{DateTime, Utc};
use linkvault_graph::prelude::*;
use linkvault_parser::OfmExtractor;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

struct MemoryVault {
    files: Vec<(&'static str, &'static str)>,
}

impl MemoryVault {
    fn new(files: &[(&'static str, &'static str)]) -> Self {
        Self {
            files: files.to_vec(),
        }
    }

    fn universe(&self) -> FileUniverse {
        let discovered = self
            .files
            .iter()
            .map(|(path, _)| DiscoveredFile {
                relative_path: PathBuf::from(path),
                absolute_path: PathBuf::from("/vault").join(path),
                modified_time: DateTime::<Utc>::UNIX_EPOCH,
            })
            .collect();
        FileUniverse::new("/vault", ExtensionSet::default(), discovered)
    }

    fn connect(&self, attachments: bool) -> LinkGraph {
        let contents: HashMap<PathBuf, &str> = self
            .files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), *text))
            .collect();
        let source = |entry: &FileEntry| -> Result<String> {
            Ok(contents
                .get(&entry.relative_path)
                .map(|text| text.to_string())
                .unwrap_or_default())
        };
        GraphBuilder::new(&OfmExtractor)
            .attachments(attachments)
            .build(self.universe(), &source)
            .expect("in-memory build never fails")
    }
}

fn stub_vault() -> MemoryVault {
    MemoryVault::new(&[
        (
            "Sussudio.md",
            "#y1982 #music #y_1982\n\nSong by [[Phil Collins]]. ![[Sussudio.mp3]]\n![[1999.flac]]",
        ),
        ("Brevissima.md", "[[Alimenta]] and [[Alimenta#Part]]"),
        ("Isolated note.md", "Nothing links here."),
        ("lipsum/Isolated note.md", "Neither here."),
        ("lipsum/Alimenta.md", "[[Vulnera ubera]] [[Brevissima]] ![[Sussudio]]"),
        ("lipsum/Ne fuit.md", "[[Alimenta]] [[Causam mihi]] [[Tarpeia]]"),
        ("Crazy wall.canvas", "{}"),
        ("Crazy wall 2.canvas", "{}"),
        ("Board.md", "[[Crazy wall 2.canvas]]"),
    ])
}

#[test]
fn test_stub_isolated_notes() {
    let graph = stub_vault().connect(false);
    assert_eq!(
        graph.isolated_notes(),
        vec!["Isolated note", "lipsum/Isolated note"]
    );
    assert_eq!(graph.isolated_canvas_files(), vec!["Crazy wall.canvas"]);
}

#[test]
fn test_stub_backlinks() {
    let graph = stub_vault().connect(false);

    assert_eq!(
        graph.backlink_counts("Alimenta").unwrap(),
        BTreeMap::from([("Brevissima".to_string(), 2), ("Ne fuit".to_string(), 1)])
    );
    assert_eq!(
        graph.backlink_counts("Sussudio").unwrap(),
        BTreeMap::from([("Alimenta".to_string(), 1)])
    );
    assert!(graph.backlink_counts("Isolated note").unwrap().is_empty());
    assert!(graph.backlink_counts("Not a note").is_err());
}

#[test]
fn test_stub_nonexistent() {
    let graph = stub_vault().connect(true);
    assert_eq!(
        graph.nonexistent_notes(),
        vec!["Phil Collins", "Vulnera ubera", "Causam mihi", "Tarpeia"]
    );
    assert_eq!(
        graph.nonexistent_media_files(),
        vec!["Sussudio.mp3", "1999.flac"]
    );
    assert!(graph.nonexistent_canvas_files().is_empty());
}

#[test]
fn test_stub_note_metadata() {
    let graph = stub_vault().connect(true);
    let rows: HashMap<String, NoteMetadata> = graph
        .note_metadata()
        .into_iter()
        .map(|row| (row.identity.clone(), row))
        .collect();

    let sussudio = &rows["Sussudio"];
    assert_eq!(sussudio.tag_count, Some(3));
    assert_eq!(sussudio.wikilink_count, Some(1));
    assert_eq!(sussudio.embedded_file_count, Some(2));
    assert_eq!(sussudio.backlink_count, 1);

    let phil = &rows["Phil Collins"];
    assert!(!phil.exists);
    assert_eq!(phil.backlink_count, 1);
    assert_eq!(phil.wikilink_count, None);
    assert_eq!(phil.tag_count, None);
    assert_eq!(phil.embedded_file_count, None);

    // Property: isolated notes have neither backlinks nor wikilinks
    for identity in graph.isolated_notes() {
        let row = &rows[&identity];
        assert_eq!(row.backlink_count, 0);
        assert_eq!(row.wikilink_count, Some(0));
    }
}

#[test]
fn test_embedded_files_index() {
    let graph = stub_vault().connect(false);
    let index = graph.embedded_files_index();
    assert_eq!(index["Sussudio"], vec!["Sussudio.mp3", "1999.flac"]);
    assert_eq!(index["Alimenta"], vec!["Sussudio"]);
    assert!(index["Isolated note"].is_empty());
    assert!(!index.contains_key("Crazy wall.canvas"));
}

#[test]
fn test_normalized_spellings_meet() {
    let graph = MemoryVault::new(&[
        ("A.md", "[[Missing Thing]] [[missing thing.md]]"),
        ("b/B.md", "[[MISSING THING#Heading|label]]"),
    ])
    .connect(false);

    assert_eq!(graph.nonexistent_notes(), vec!["Missing Thing"]);
    assert_eq!(
        graph.backlink_counts("missing THING").unwrap(),
        BTreeMap::from([("A".to_string(), 2), ("B".to_string(), 1)])
    );
}

#[test]
fn test_connect_is_idempotent() {
    let vault = stub_vault();
    let first = vault.connect(true);
    let second = vault.connect(true);

    assert_eq!(first.note_metadata(), second.note_metadata());
    assert_eq!(first.media_metadata(), second.media_metadata());
    assert_eq!(first.canvas_metadata(), second.canvas_metadata());
    assert_eq!(first.stats(), second.stats());
}
