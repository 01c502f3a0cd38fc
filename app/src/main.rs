use std::{sync::Arc, thread};

use blackboard::{Blackboard, Config, logging::ChannelLogger};
use log::LevelFilter;

#[derive(Debug, Clone, Default)]
struct Test {
    val: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (logger, log_recv) = ChannelLogger::with_receiver(LevelFilter::Debug);
    logger.install()?;

    let board = Arc::new(Blackboard::with_config(Config::default().with_label("demo")));

    board.subscribe_pair::<i32>("key", |key, val| {
        println!("Entry with the key {key} changed to {val}");
    });

    board.write_with("key", 5_i32, true);
    board.write("class", Test::default());

    let value = board.read::<i32>("key")?;
    let t2 = board.read::<Test>("class")?;
    println!("key = {value}, class.val = {}", t2.val);

    board.write::<String>("str", "val".into());
    let s = board.read::<String>("str")?;
    println!("str = {s}");

    // One key string, two independent values
    board.write::<String>("key", "five".into());
    board.wipe_type_key::<i32>("key")?;
    println!("after wiping the i32: {:?}", board.read::<i32>("key"));
    println!("the String survives: {:?}", board.read::<String>("key"));

    // Writers on other threads reach the same subscriber
    let workers: Vec<_> = (0..3)
        .map(|i| {
            let board = Arc::clone(&board);
            thread::spawn(move || board.write("key", 10 + i))
        })
        .collect();
    for worker in workers {
        if worker.join().is_err() {
            return Err("worker thread panicked".into());
        }
    }

    board.wipe_board(true);
    println!("{board:?}");

    for message in log_recv.try_iter() {
        println!("{} - {}", message.level, message.message);
    }

    Ok(())
}
