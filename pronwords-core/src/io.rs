use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Reads a corpus file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Invalid UTF-8 is replaced rather than rejected, a corpus is only
///   mined for letters
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut bytes = Vec::new();
	File::open(filename)?.read_to_end(&mut bytes)?;
	Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect())
}

/// Streams whitespace-delimited tokens out of a reader.
///
/// Each token is handed to `sink` as soon as its line has been read, so
/// tokens seen before a read failure are never lost.
///
/// # Returns
/// - `Ok(n)`: the number of tokens delivered, once the end of stream is reached.
/// - `Err(e)`: the first read failure. Tokens delivered so far stay delivered.
pub(crate) fn for_each_token<R, F>(reader: R, mut sink: F) -> io::Result<usize>
where
	R: Read,
	F: FnMut(&str),
{
	let mut reader = BufReader::new(reader);
	let mut buffer = Vec::new();
	let mut delivered = 0;

	loop {
		buffer.clear();
		match reader.read_until(b'\n', &mut buffer) {
			Ok(0) => return Ok(delivered),
			Ok(_) => {
				for token in String::from_utf8_lossy(&buffer).split_whitespace() {
					sink(token);
					delivered += 1;
				}
			}
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
}
