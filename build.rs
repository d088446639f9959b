use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let generation_file = Path::new(&out_dir).join("lookup.rs");
    let evaluation_file = Path::new(&out_dir).join("evaluation_constants.rs");
    let mut file = File::create(generation_file).unwrap();

    let processed_consts = BuildPreprocessor::process();
    writeln!(&mut file, "impl Bitboard {{").unwrap();

    inject_array(
        &mut file,
        "pub const KNIGHT_ATTACKS: [Bitboard; 64]",
        &processed_consts.knight_attacks,
        Some("Bitboard"),
    );
    inject_array(
        &mut file,
        "pub const KING_ATTACKS: [Bitboard; 64]",
        &processed_consts.king_attacks,
        Some("Bitboard"),
    );
    inject_2d_array(
        &mut file,
        "pub const RAYS: [[Bitboard; 64]; 8]",
        Vec::from(processed_consts.rays.map(Vec::from)),
        Some("Bitboard"),
    );
    writeln!(&mut file, "}}").unwrap();

    // Tables are written from white's point of view, rank 8 first, so that they
    // read like a diagram. White pieces look them up through a vertical flip.
    file = File::create(evaluation_file).unwrap();
    writeln!(
        &mut file,
        "
        pub const PIECE_SQUARE_TABLE: [[Score; 64]; 5] = [
            [
                  0,   0,   0,   0,   0,   0,   0,   0,
                 50,  50,  50,  50,  50,  50,  50,  50,
                 10,  10,  20,  30,  30,  20,  10,  10,
                  5,   5,  10,  25,  25,  10,   5,   5,
                  0,   0,   0,  20,  20,   0,   0,   0,
                  5,  -5, -10,   0,   0, -10,  -5,   5,
                  5,  10,  10, -20, -20,  10,  10,   5,
                  0,   0,   0,   0,   0,   0,   0,   0,
            ],
            [
                -50, -40, -30, -30, -30, -30, -40, -50,
                -40, -20,   0,   0,   0,   0, -20, -40,
                -30,   0,  10,  15,  15,  10,   0, -30,
                -30,   5,  15,  20,  20,  15,   5, -30,
                -30,   0,  15,  20,  20,  15,   0, -30,
                -30,   5,  10,  15,  15,  10,   5, -30,
                -40, -20,   0,   5,   5,   0, -20, -40,
                -50, -40, -30, -30, -30, -30, -40, -50,
            ],
            [
                -20, -10, -10, -10, -10, -10, -10, -20,
                -10,   0,   0,   0,   0,   0,   0, -10,
                -10,   0,   5,  10,  10,   5,   0, -10,
                -10,   5,   5,  10,  10,   5,   5, -10,
                -10,   0,  10,  10,  10,  10,   0, -10,
                -10,  10,  10,  10,  10,  10,  10, -10,
                -10,   5,   0,   0,   0,   0,   5, -10,
                -20, -10, -10, -10, -10, -10, -10, -20,
            ],
            [
                  0,   0,   0,   0,   0,   0,   0,   0,
                  5,  10,  10,  10,  10,  10,  10,   5,
                 -5,   0,   0,   0,   0,   0,   0,  -5,
                 -5,   0,   0,   0,   0,   0,   0,  -5,
                 -5,   0,   0,   0,   0,   0,   0,  -5,
                 -5,   0,   0,   0,   0,   0,   0,  -5,
                 -5,   0,   0,   0,   0,   0,   0,  -5,
                  0,   0,   0,   5,   5,   0,   0,   0,
            ],
            [
                -20, -10, -10,  -5,  -5, -10, -10, -20,
                -10,   0,   0,   0,   0,   0,   0, -10,
                -10,   0,   5,   5,   5,   5,   0, -10,
                 -5,   0,   5,   5,   5,   5,   0,  -5,
                  0,   0,   5,   5,   5,   5,   0,  -5,
                -10,   5,   5,   5,   5,   5,   0, -10,
                -10,   0,   5,   0,   0,   0,   0, -10,
                -20, -10, -10,  -5,  -5, -10, -10, -20,
            ],
        ];
        pub const KING_MIDGAME_TABLE: [Score; 64] = [
            -30, -40, -40, -50, -50, -40, -40, -30,
            -30, -40, -40, -50, -50, -40, -40, -30,
            -30, -40, -40, -50, -50, -40, -40, -30,
            -30, -40, -40, -50, -50, -40, -40, -30,
            -20, -30, -30, -40, -40, -30, -30, -20,
            -10, -20, -20, -20, -20, -20, -20, -10,
             20,  20,   0,   0,   0,   0,  20,  20,
             20,  30,  10,   0,   0,  10,  30,  20,
        ];
        pub const KING_ENDGAME_TABLE: [Score; 64] = [
            -50, -40, -30, -20, -20, -30, -40, -50,
            -30, -20, -10,   0,   0, -10, -20, -30,
            -30, -10,  20,  30,  30,  20, -10, -30,
            -30, -10,  30,  40,  40,  30, -10, -30,
            -30, -10,  30,  40,  40,  30, -10, -30,
            -30, -10,  20,  30,  30,  20, -10, -30,
            -30, -30,   0,   0,   0,   0, -30, -30,
            -50, -30, -30, -30, -30, -30, -30, -50,
        ];
        "
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}

fn inject_array<T: ToString>(file: &mut File, declaration: &str, array: &[T], constructor: Option<&str>) {
    writeln!(file, "{} = [", declaration).unwrap();
    for value in array {
        write!(
            file,
            "{}, ",
            match constructor {
                Some(c) => c.to_owned() + "(" + &value.to_string() + ")",
                None => value.to_string(),
            }
        )
        .unwrap();
    }
    writeln!(file, "];").unwrap();
}

fn inject_2d_array<T: ToString>(file: &mut File, declaration: &str, array: Vec<Vec<T>>, constructor: Option<&str>) {
    writeln!(file, "{} = [", declaration).unwrap();
    for slice in array {
        write!(file, "[").unwrap();
        for value in slice {
            write!(
                file,
                "{}, ",
                match constructor {
                    Some(c) => c.to_owned() + "(" + &value.to_string() + ")",
                    None => value.to_string(),
                }
            )
            .unwrap();
        }
        writeln!(file, "], ").unwrap();
    }
    writeln!(file, "];").unwrap();
}

struct BuildPreprocessor {
    pub knight_attacks: Vec<u64>,
    pub king_attacks: Vec<u64>,
    pub rays: [[u64; 64]; 8],
}

impl BuildPreprocessor {
    pub fn process() -> BuildPreprocessor {
        BuildPreprocessor {
            knight_attacks: Self::process_knight_moves(),
            king_attacks: Self::process_king_moves(),
            rays: Self::process_rays(),
        }
    }

    fn process_knight_moves() -> Vec<u64> {
        let knight_shifts: [fn(u64) -> u64; 8] = [
            |bb| (bb << 10) & !0x303030303030303,
            |bb| (bb >> 10) & !0xc0c0c0c0c0c0c0c0,
            |bb| (bb << 17) & !0x101010101010101,
            |bb| (bb >> 17) & !0x8080808080808080,
            |bb| (bb << 15) & !0x8080808080808080,
            |bb| (bb >> 15) & !0x101010101010101,
            |bb| (bb << 6) & !0xc0c0c0c0c0c0c0c0,
            |bb| (bb >> 6) & !0x303030303030303,
        ];
        (0..64)
            .map(|sq| {
                let origin = 1u64 << sq;
                knight_shifts.iter().fold(0u64, |attacks, shift| attacks | shift(origin))
            })
            .collect()
    }

    fn process_king_moves() -> Vec<u64> {
        let king_shifts: [fn(u64) -> u64; 8] = [
            |bb| (bb >> 1) & !0x8080808080808080,
            |bb| (bb << 1) & !0x101010101010101,
            |bb| (bb << 7) & !0x8080808080808080,
            |bb| (bb >> 7) & !0x101010101010101,
            |bb| (bb << 9) & !0x101010101010101,
            |bb| (bb >> 9) & !0x8080808080808080,
            |bb| bb << 8,
            |bb| bb >> 8,
        ];
        (0..64)
            .map(|sq| {
                let origin = 1u64 << sq;
                king_shifts.iter().fold(0u64, |attacks, shift| attacks | shift(origin))
            })
            .collect()
    }

    // Even indices grow square indices (east, north, north-west, north-east),
    // odd indices shrink them (west, south, south-east, south-west).
    fn process_rays() -> [[u64; 64]; 8] {
        let shifts: [fn(u64) -> u64; 8] = [
            |b| (b << 1) & !0x101010101010101,
            |b| (b >> 1) & !0x8080808080808080,
            |b| b << 8,
            |b| b >> 8,
            |b| (b << 7) & !0x8080808080808080,
            |b| (b >> 7) & !0x101010101010101,
            |b| (b << 9) & !0x101010101010101,
            |b| (b >> 9) & !0x8080808080808080,
        ];

        let mut results = [[0u64; 64]; 8];
        for sq in 0..64 {
            let origin = 1u64 << sq;
            for (i, shift) in shifts.iter().enumerate() {
                let mut ray = 0u64;
                let mut current = origin;
                while current != 0 {
                    current = shift(current);
                    ray |= current;
                }
                results[i][sq] = ray;
            }
        }
        results
    }
}
