use rand::prelude::{Rng, SeedableRng, SmallRng};

use hdf5_tree::{Datatype, Node, NodeType, NodeVariant, NodeView, Path, Result};

mod common;

use self::common::util::with_tmp_file;

fn walk(view: &NodeView, out: &mut Vec<(String, NodeType)>) -> Result<()> {
    for node in view {
        let node = node?;
        out.push((node.name(), node.node_type()));
        if let NodeVariant::Group(group) = node.classify()? {
            walk(&group.nodes(), out)?;
        }
    }
    Ok(())
}

#[test]
pub fn test_recursive_walk() {
    with_tmp_file(|file| {
        file.create_group("a/b/c").unwrap();
        file.create_group("a/d").unwrap();
        file.new_dataset::<f64>().shape(3).create("a/b/x").unwrap();
        file.new_dataset::<u8>().create("y").unwrap();
        file.commit_datatype("t", &Datatype::from_type::<i16>().unwrap()).unwrap();

        let mut found = Vec::new();
        walk(&file.nodes(), &mut found).unwrap();
        let expected = vec![
            ("/a".to_owned(), NodeType::Group),
            ("/a/b".to_owned(), NodeType::Group),
            ("/a/b/c".to_owned(), NodeType::Group),
            ("/a/b/x".to_owned(), NodeType::Dataset),
            ("/a/d".to_owned(), NodeType::Group),
            ("/t".to_owned(), NodeType::Datatype),
            ("/y".to_owned(), NodeType::Dataset),
        ];
        assert_eq!(found, expected);
    })
}

#[test]
pub fn test_resolve_paths() {
    with_tmp_file(|file| {
        file.create_group("one/two").unwrap();
        let two = file.node(Path::root() + "one" + "two").unwrap();
        assert_eq!(two.path().to_string(), "/one/two");
        assert_eq!(two.link_name(), "two");
        assert_eq!(Node::from(two.parent().unwrap()), file.node("/one").unwrap());
        let one = file.group("one").unwrap();
        assert_eq!(one.node("two").unwrap(), two);
        assert!(one.exists(Path::parse("two")));
        assert!(!one.exists(Path::parse("two/three")));
    })
}

#[test]
pub fn test_iterator_validity_matches_range() {
    let mut rng = SmallRng::seed_from_u64(7);
    with_tmp_file(|file| {
        let n = 5;
        for i in 0..n {
            file.create_group(&format!("g{i}")).unwrap();
        }
        let view = file.nodes();
        for _ in 0..100 {
            let offset: isize = rng.gen_range(-10..10);
            let it = view.begin() + offset;
            assert_eq!(it.is_valid(), (0..n).contains(&offset), "{offset}");
            assert_eq!(it.get().is_ok(), it.is_valid());
            let other = view.end() - (n - offset);
            assert!(it == other);
            assert_eq!(it.distance(&other), Some(0));
        }
    })
}

#[test]
pub fn test_views_of_subgroups() {
    with_tmp_file(|file| {
        let g = file.create_group("g").unwrap();
        for name in ["c", "a", "b"] {
            g.new_dataset::<i32>().create(name).unwrap();
        }
        let view = file.node("g").unwrap().children().unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.names().unwrap(), vec!["a", "b", "c"]);
        let mut it = view.end();
        it.dec();
        assert_eq!(it.get().unwrap().name(), "/g/c");
        it -= 2;
        assert_eq!(it.current().unwrap().as_dataset().unwrap().name(), "/g/a");
        assert!(file.node("g/a").unwrap().children().is_err());
    })
}
