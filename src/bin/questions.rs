use std::env;

use prevpanel::{dataset, options};

/// Walks the cascading selection options of a survey export: classes with
/// no further argument, topics within a class, questions within a
/// (class, topic) pair. One option per line on stdout.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .expect("Usage: questions <DATASET_CSV> [CLASS] [TOPIC]");
    let class = args.next();
    let topic = args.next();

    let mut ds = dataset::load_csv(&path)?;
    dataset::strip_calculated_questions(&mut ds);

    let values = match (&class, &topic) {
        (None, _) => options::class_options(&ds),
        (Some(class), None) => options::topic_options(&ds, class),
        (Some(class), Some(topic)) => options::question_options(&ds, class, topic),
    };
    for value in values {
        println!("{}", value);
    }

    Ok(())
}
