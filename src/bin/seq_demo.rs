// Walk through every chanseq combinator on small inputs.
//
// Usage: seq_demo [-v] [CONFIG_FILE]
//   -v            trace stage threads starting and stopping
//   CONFIG_FILE   .toml or .json pipeline config (capacity, thread_prefix, stack_size)

use chanseq::{count, multi_map, new, repeat_n, zip, zip_longest, Config, Value};
use colored::Colorize;
use std::env;
use tracing::Level;

fn section(title: &str) {
    println!("\n{}\n{}", title.bold().cyan(), "-".repeat(40));
}

fn run(config: Config) {
    // =========================================================================
    // Sources
    // =========================================================================
    section("Sources");
    let words = config.clone().values(vec!["a", "b", "ccc"]);
    println!("cycle x7      {:?}", words.cycle().slice(0, 7, 1).list());
    println!("count from 1  {:?}", config.clone().count(1i64).slice(0, 5, 1).list());
    println!("repeat 100x4  {:?}", repeat_n(100u64, 4).list());
    println!(
        "chain         {:?}",
        new(vec![1, 2, 3]).chain(new(vec![3, 2, 1])).list()
    );

    // =========================================================================
    // Stages
    // =========================================================================
    section("Stages");
    println!(
        "map len       {:?}",
        new(vec!["a", "ab", "abc", "abcd"]).map(str::len).list()
    );
    println!(
        "filter odd    {:?}",
        new(1u64..=10).filter(|n| n % 2 == 1).list()
    );
    println!(
        "take_while    {:?}",
        count(0).take_while(|&n| n < 4).list()
    );
    println!(
        "drop_while    {:?}",
        count(0).drop_while(|&n| n < 10).slice(0, 3, 1).list()
    );
    println!("slice 3..11/3 {:?}", count(0).slice(3, 11, 3).list());

    // =========================================================================
    // Fan-in / fan-out
    // =========================================================================
    section("Fan-in / fan-out");
    let sums = multi_map(
        vec![new(vec![5.2, 1.6, 2.2]), new(vec![5.2, 1.0])],
        |round: Vec<f64>| round.iter().sum::<f64>(),
    );
    println!("multi_map     {:?}", sums.list());

    let mixed = zip_longest(vec![
        count(1i32).slice(0, 3, 1).map(Value::from),
        new(vec![Value::from("a")]),
    ]);
    println!("zip_longest   {:?}", mixed.list());

    let products = zip(vec![new(vec![1, 2, 3]), repeat_n(10, 3)])
        .starmap(|args: Vec<i32>| args.iter().product::<i32>());
    println!("starmap       {:?}", products.list());

    let (fast, slow) = new(vec![5, 4, 3, 2, 1]).tee2();
    println!("tee fast      {:?}", fast.list());
    println!("tee slow      {:?}", slow.list());

    // =========================================================================
    // Terminal
    // =========================================================================
    section("Terminal");
    let total = new(vec![0.1f64, 0.2, 0.3, 0.22]).reduce(|acc, n| acc + n, 0.0f64);
    println!("reduce sum    {total:.2}");

    let letters = new(vec!["a", "a", "b", "c", "d", "c", "b"]).list();
    println!("unique        {:?}", letters.unique_string());
    println!("sorted        {:?}", letters.sort_string());
}

fn main() -> chanseq::Result<()> {
    let mut verbose = false;
    let mut config_path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => config_path = Some(arg),
        }
    }

    let level = if verbose { Level::TRACE } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    println!(
        "{} capacity={} prefix={}",
        "chanseq demo".bold().green(),
        config.capacity,
        config.thread_prefix
    );

    run(config);
    Ok(())
}
