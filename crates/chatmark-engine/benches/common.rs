// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_reply(size: usize) -> String {
    let base = "## Section\n\n\
        A paragraph with **bold**, *italic* and `code`. \
        It has a [link](https://example.com/a_b) too.\n\n\
        - Bullet point with ~~strike~~\n- Another item ||hidden||\n\n\
        ```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n\
        | key | value |\n|-----|-------|\n| a | 1 |\n| b | 2 |\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_long_paragraph(sentences: usize) -> String {
    let mut content = String::from("**");
    for i in 0..sentences {
        content.push_str(&format!(
            "Sentence number {i} keeps the bold span open across many chunks. "
        ));
    }
    content.push_str("**");
    content
}
