#[macro_use]
extern crate criterion;

use criterion::Criterion;
use fastq_core::parser::{Event, FastqParser};
use fastq_core::record::ByteRecord;
use std::iter::repeat;

/// number of records for all benchmarks
const N: usize = 10_000;

/// generates 'nrecords' FASTQ records with given properties
fn gen_fastq(nrecords: usize, id_len: usize, seq_len: usize, cr: bool) -> Vec<u8> {
    let newline = if cr { b"\r\n".to_vec() } else { b"\n".to_vec() };
    let mut out = Vec::new();
    for i in 0..nrecords {
        out.push(b'@');
        out.extend(repeat(b'i').take(id_len));
        out.extend(format!("{}", i).bytes());
        out.extend(&newline);
        out.extend(repeat(b'A').take(seq_len));
        out.extend(&newline);
        out.push(b'+');
        out.extend(&newline);
        out.extend(repeat(b'I').take(seq_len));
        out.extend(&newline);
    }
    out
}

macro_rules! bench_base {
    ($c:expr, $name:expr, $input_data:expr, $data:ident, $code:block) => {
        let name = format!("fastq {} {}", $name, $input_data.len());
        $c.bench_function(&name, move |b| {
            b.iter(|| {
                let $data = $input_data.as_slice();
                $code
            })
        });
    };
}

macro_rules! bench {
    ($c:expr, $name:expr, $seqlen:expr, $data:ident, $code:block) => {
        let data = gen_fastq(N, 20, $seqlen, false);
        bench_base!($c, $name, data, $data, $code);
    };
}

fn drain(data: &[u8], cap: usize) {
    let mut parser = FastqParser::<_, ByteRecord>::new(data, cap).unwrap();
    loop {
        match parser.next().unwrap() {
            Event::Header(_) => {}
            Event::Record(_) => {}
            Event::End => break,
        }
    }
}

fn readers(c: &mut Criterion) {
    bench!(c, "fastq-core 200", 200, data, {
        drain(data, 1 << 16);
    });
    bench!(c, "fastq-core 500", 500, data, {
        drain(data, 1 << 16);
    });
    bench!(c, "fastq-core 1000", 1000, data, {
        drain(data, 1 << 16);
    });
}

// compare different initial buffer capacities

macro_rules! bench_cap {
    ($c:expr, $name:expr, $seqlen:expr, $cap:expr) => {
        bench!($c, $name, $seqlen, data, {
            drain(data, $cap);
        });
    };
}

fn readers_cap(c: &mut Criterion) {
    bench_cap!(c, "fastq-core_cap 200 8ki", 200, 1 << 13);
    bench_cap!(c, "fastq-core_cap 200 16ki", 200, 1 << 14);
    bench_cap!(c, "fastq-core_cap 200 32ki", 200, 1 << 15);
    bench_cap!(c, "fastq-core_cap 200 64ki", 200, 1 << 16);
    bench_cap!(c, "fastq-core_cap 200 128ki", 200, 1 << 17);

    bench_cap!(c, "fastq-core_cap 1000 8ki", 1000, 1 << 13);
    bench_cap!(c, "fastq-core_cap 1000 16ki", 1000, 1 << 14);
    bench_cap!(c, "fastq-core_cap 1000 32ki", 1000, 1 << 15);
    bench_cap!(c, "fastq-core_cap 1000 64ki", 1000, 1 << 16);
    bench_cap!(c, "fastq-core_cap 1000 128ki", 1000, 1 << 17);
}

criterion_group!(benches, readers, readers_cap);
criterion_main!(benches);
