//! Basic example: build a small store, query it, then delete through it.

use avldb::{IndexedStore, Record};

fn main() -> anyhow::Result<()> {
    let mut store = IndexedStore::new();

    let people = [("ada", 36), ("grace", 45), ("alan", 41), ("edsger", 72), ("barbara", 51)];
    for (name, age) in people {
        store.insert(Record::new(name, age));
    }

    match store.search("alan", 41) {
        Some(record) => println!("found {record}"),
        None => println!("alan missing"),
    }
    println!("lookup cost: {} comparisons", store.tree().last_search_comparisons());

    for record in store.range_query(40, 60) {
        println!("in [40, 60]: {record}");
    }

    store.delete("grace", 45);
    println!("height after delete: {}", store.tree_height());

    store.verify()?;
    Ok(())
}
