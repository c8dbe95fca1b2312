use std::env;
use std::fs;

/// Split specified files into batches and print them
fn main() {
    env_logger::init();
    let args = env::args();
    for arg in args.skip(1) {
        let sql = fs::read_to_string(&arg).unwrap();
        for (i, batch) in sql_batch::split(&sql, "go").iter().enumerate() {
            println!("-- batch {} of {}", i + 1, arg);
            print!("{batch}");
        }
    }
}
