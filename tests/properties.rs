use proptest::prelude::*;
use settings_forge::compiler::{CompiledEntry, Compiler};
use settings_forge::schema::{Property, PropertyNode, Tree};
use settings_forge::search::SearchIndex;
use settings_forge::visualizer::VisualizerKind;

const CATEGORIES: [&str; 3] = ["Audio", "Video", "Controls"];

fn unique_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,8}", 1..24).prop_map(|ids| ids.into_iter().collect())
}

proptest! {
    #[test]
    fn buckets_keep_insertion_order(
        ids in unique_ids(),
        picks in prop::collection::vec(0..CATEGORIES.len(), 24),
    ) {
        let flag = Property::new(false);
        let mut tree = Tree::new("root");
        for (id, pick) in ids.iter().zip(&picks) {
            tree.insert(
                PropertyNode::new(id.as_str(), &flag)
                    .title(id)
                    .category(CATEGORIES[*pick])
                    .visualizer(VisualizerKind::TOGGLE),
            );
        }

        let schema = Compiler::default().compile(&tree).unwrap();
        for category in CATEGORIES {
            let expected = ids
                .iter()
                .zip(&picks)
                .filter(|(_, pick)| CATEGORIES[**pick] == category)
                .map(|(id, _)| id.as_str())
                .collect::<Vec<_>>();
            let actual = schema
                .page(category)
                .map(|page| page.entries().map(CompiledEntry::title).collect::<Vec<_>>())
                .unwrap_or_default();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn single_characters_never_match(
        titles in prop::collection::vec("[A-Za-z ]{0,10}", 0..16),
        query in "\\PC",
    ) {
        let flag = Property::new(false);
        let mut tree = Tree::new("root");
        for (index, title) in titles.iter().enumerate() {
            tree.insert(
                PropertyNode::new(format!("p{index}"), &flag)
                    .title(title)
                    .visualizer(VisualizerKind::TOGGLE),
            );
        }

        let mut compiler = Compiler::default();
        compiler.compile(&tree).unwrap();
        prop_assert!(compiler.query(&query).is_empty());
    }

    #[test]
    fn any_substring_of_a_title_finds_it(
        title in "[A-Za-z]{2,16}",
        start in 0usize..16,
        len in 2usize..16,
    ) {
        let start = start % (title.len() - 1);
        let end = (start + len).min(title.len());
        prop_assume!(end - start >= 2);
        let query = title[start..end].to_uppercase();

        let flag = Property::new(false);
        let tree = Tree::new("root").child(
            PropertyNode::new("subject", &flag)
                .title(&title)
                .visualizer(VisualizerKind::TOGGLE),
        );
        let mut compiler = Compiler::default();
        compiler.compile(&tree).unwrap();

        prop_assert_eq!(compiler.query(&query).len(), 1);
    }
}

#[test]
fn index_spans_every_compiled_tree() {
    let flag = Property::new(false);
    let first = Tree::new("first").child(
        PropertyNode::new("volume", &flag)
            .title("Volume")
            .visualizer(VisualizerKind::TOGGLE),
    );
    let second = Tree::new("second").child(
        PropertyNode::new("volme", &flag)
            .title("Volme")
            .visualizer(VisualizerKind::TOGGLE),
    );

    let mut compiler = Compiler::default();
    compiler.compile(&first).unwrap();
    compiler.compile(&second).unwrap();

    let labels = compiler
        .query("Vol")
        .iter()
        .map(|handle| handle.label().unwrap_or_default().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(labels, ["Volume", "Volme"]);
    assert!(compiler.query("a").is_empty());
}

#[test]
fn fresh_index_is_empty() {
    let index = SearchIndex::new();
    assert!(index.is_empty());
    assert!(index.query("anything").is_empty());
}
