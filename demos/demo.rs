use rowdb::render::{OutputMode, render_query};
use rowdb::*;

fn main() -> Result<()> {
    println!("In-Memory Database Demo\n");

    // Create DB
    let mut db = Database::new();

    // Create tables through SQL
    db.execute_script(
        "CREATE TABLE users (id int, name str, age int);
         CREATE TABLE orders (order_id int, user_id int, amount int);",
    )?;
    println!("Created tables: {}", db.list_tables().join(", "));

    // Insert data, positionally and with a column list
    println!("Inserting data...");
    db.execute_script(
        "INSERT INTO users VALUES (1, 'Alice', 30);
         INSERT INTO users (name, age, id) VALUES ('Bob', 41, 2);
         INSERT INTO users VALUES (3, 'Charlie', 25);
         INSERT INTO orders VALUES (100, 1, 250);
         INSERT INTO orders VALUES (101, 3, 75);
         INSERT INTO orders VALUES (102, 1, 40);",
    )?;

    // Rows can also go straight through the storage API
    db.insert_row("orders", vec![Value::Int(103), Value::Int(2), Value::Int(990)])?;
    println!("Inserted {} rows\n", db.stats().total_rows);

    println!("Users older than 26:");
    let result = db.query("SELECT name, age FROM users WHERE age > 26")?;
    print!("{}", render_query(&result, OutputMode::Table));

    println!("\nOrders with their buyer:");
    let result = db.query(
        "SELECT users.name, orders.order_id, orders.amount FROM users \
         INNER JOIN orders ON users.id = orders.user_id \
         WHERE orders.amount > 50",
    )?;
    print!("{}", render_query(&result, OutputMode::Table));

    println!("\nUpdating and deleting...");
    db.execute("UPDATE users SET age = 31 WHERE name = 'Alice'")?;
    if let ExecutionResult::RowsAffected(n) = db.execute("DELETE FROM orders WHERE amount < 100")? {
        println!("Deleted {n} small orders");
    }

    println!("\nAll orders as CSV:");
    let result = db.query("SELECT * FROM orders")?;
    print!("{}", render_query(&result, OutputMode::Csv));

    println!("\nErrors are reported per phase:");
    for sql in [
        "SELECT * FROM users WHERE name = 'unterminated",
        "SELECT * FROM users WHERE NOT age = 1",
        "SELECT * FROM users WHERE age = 'thirty'",
    ] {
        if let Err(err) = db.execute(sql) {
            println!("  {err}");
        }
    }

    Ok(())
}
