mod cli_parse;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use huffman_core::{CorruptedStream, Decoder, Encoder, FreqCounter};
use shared_files::stats::{CompressionStatsBuilder, OptinalStatsTimer};

use cli_parse::{CliError, Operation};

const CHUNK_SIZE: usize = 1 << 20;

fn main() {
    let args = match cli_parse::parse_args() {
        Ok(args) => args,
        Err(CliError::ClapError(e)) => e.exit(),
        Err(e) => fail(&e),
    };

    let output = args.output_path();
    let result = match args.operation() {
        Ok(Operation::Compress) => compress_file(&args.input, &output, args.verbose),
        Ok(Operation::Decompress) => decompress_file(&args.input, &output, args.verbose),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        fail(&e);
    }
}

fn fail(e: &CliError) -> ! {
    eprintln!("[FAIL] : {e}");
    std::process::exit(1);
}

fn compress_file(input: &Path, output: &Path, verbose: bool) -> Result<(), CliError> {
    let original_len = input.metadata()?.len() as usize;
    let mut timer = OptinalStatsTimer::new(verbose);

    let hist_section = timer.start_section("Histogram");
    let freq = histogram_pass(input)?;
    timer.add_section(hist_section);

    let tree_section = timer.start_section("Tree build");
    let encoder = Encoder::new(&freq);
    timer.add_section(tree_section);

    let encode_section = timer.start_section("Encode + write");
    let processed_len = encode_pass(input, output, &encoder)?;
    timer.add_section(encode_section);

    if verbose {
        print_stats(timer, "Huffman", original_len, processed_len, true);
    }
    Ok(())
}

fn histogram_pass(input: &Path) -> Result<FreqCounter, CliError> {
    let file = File::open(input)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut freq = FreqCounter::new();
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        freq.update_bytes(chunk);
        let len = chunk.len();
        reader.consume(len);
    }
    Ok(freq)
}

fn encode_pass(input: &Path, output: &Path, encoder: &Encoder) -> Result<usize, CliError> {
    let file = File::open(input)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut writer = BufWriter::new(File::create(output)?);
    let mut written = encoder.tree_frame().len();
    writer.write_all(encoder.tree_frame())?;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let block = encoder.encode(chunk);
        written += block.len();
        writer.write_all(&block)?;
        let len = chunk.len();
        reader.consume(len);
    }

    writer.flush()?;
    Ok(written)
}

fn decompress_file(input: &Path, output: &Path, verbose: bool) -> Result<(), CliError> {
    let original_len = input.metadata()?.len() as usize;
    let mut timer = OptinalStatsTimer::new(verbose);
    let section = timer.start_section("Decode + write");

    let file = File::open(input)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut writer = BufWriter::new(File::create(output)?);
    let mut decoder = Decoder::new();
    let mut processed_len = 0usize;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let chunk_len = chunk.len();
        let chunk = chunk.to_vec();
        reader.consume(chunk_len);

        let mut cursor = 0;
        if !decoder.is_tree_ready() {
            cursor = decoder.initialize_tree(&chunk).map_err(map_corrupted)?;
        }
        if decoder.is_tree_ready() && cursor < chunk.len() {
            decoder.prepare(&chunk[cursor..]).map_err(map_corrupted)?;
        }

        let mut out: Vec<u8> = Vec::new();
        decoder.decode(&mut out);
        if !out.is_empty() {
            processed_len += out.len();
            writer.write_all(&out)?;
        }
    }

    if !decoder.read_finished_success() {
        return Err(CliError::Corrupted(CorruptedStream::new(
            "input ended before the stream completed",
        )));
    }

    writer.flush()?;
    timer.add_section(section);
    if verbose {
        print_stats(timer, "Huffman", original_len, processed_len, false);
    }
    Ok(())
}

fn map_corrupted(e: CorruptedStream) -> CliError {
    CliError::Corrupted(e)
}

fn print_stats(
    timer: OptinalStatsTimer,
    algorithm_name: &'static str,
    original_len: usize,
    processed_len: usize,
    is_compression: bool,
) {
    let (duration, sections) = timer.end();
    let stats = CompressionStatsBuilder::new()
        .algorithm_name(algorithm_name)
        .algorithm_id(2)
        .version_used(1)
        .original_len(original_len)
        .processed_len(processed_len)
        .duration(duration)
        .is_compression(is_compression)
        .sections(sections)
        .build();
    match stats {
        Ok(stats) => println!("{stats}"),
        Err(e) => eprintln!("[FAIL] : {e}"),
    }
}
