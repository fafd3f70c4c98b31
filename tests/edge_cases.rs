// tests/edge_cases.rs
//
// Edge case tests for mosaic
// Boundary blocks, degenerate worker counts, and tiny images

use mosaic::engine::{average_and_fill, column_bands, PixelBuffer};
use mosaic::{Mode, Processor};

fn counting_buffer(width: u32, height: u32) -> PixelBuffer {
    let data: Vec<u8> = (0..width as usize * height as usize)
        .map(|v| v as u8)
        .collect();
    PixelBuffer::from_raw(width, height, 1, data).unwrap()
}

mod boundary_blocks {
    use super::*;

    #[test]
    fn test_5x5_block_3_produces_four_blocks() {
        // Pixel values 0..24 row-major. The grid splits into a full 3x3 at
        // (0,0), a 3x2 at (0,3), a 2x3 at (3,0), and a 2x2 at (3,3).
        let mut buf = counting_buffer(5, 5);
        Processor::new(3, Mode::Single)
            .unwrap()
            .process(&mut buf, None)
            .unwrap();

        // (0+1+2+5+6+7+10+11+12) / 9 = 56 / 9 -> 6
        // (3+4+8+9+13+14)        / 6 = 51 / 6 -> 8
        // (15+16+17+20+21+22)    / 6 = 111 / 6 -> 18
        // (18+19+23+24)          / 4 = 84 / 4 -> 21
        let expected = [
            [6, 6, 6, 8, 8],
            [6, 6, 6, 8, 8],
            [6, 6, 6, 8, 8],
            [18, 18, 18, 21, 21],
            [18, 18, 18, 21, 21],
        ];
        for row in 0..5 {
            for col in 0..5 {
                assert_eq!(
                    buf.pixel(row, col),
                    &[expected[row as usize][col as usize]],
                    "pixel ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_indivisible_dimensions_in_both_modes() {
        let mut single = counting_buffer(7, 5);
        let mut multi = single.clone();
        Processor::new(3, Mode::Single)
            .unwrap()
            .process(&mut single, None)
            .unwrap();
        Processor::new(3, Mode::Multi)
            .unwrap()
            .workers(4)
            .process(&mut multi, None)
            .unwrap();
        assert_eq!(multi, single);
    }

    #[test]
    fn test_trailing_partial_block_averages_existing_pixels_only() {
        // 4 wide, block 3: the right block is 1 column wide.
        let mut buf = counting_buffer(4, 3);
        average_and_fill(&mut buf, 0, 3, 3);
        // Column 3 values: 3, 7, 11 -> 21 / 3 = 7.
        for row in 0..3 {
            assert_eq!(buf.pixel(row, 3), &[7]);
        }
        // Other columns untouched.
        assert_eq!(buf.pixel(0, 0), &[0]);
        assert_eq!(buf.pixel(2, 2), &[10]);
    }
}

mod degenerate_inputs {
    use super::*;

    #[test]
    fn test_1x1_image_any_block_size() {
        for block_size in [1, 2, 1000] {
            let mut buf = PixelBuffer::from_raw(1, 1, 3, vec![9, 8, 7]).unwrap();
            Processor::new(block_size, Mode::Multi)
                .unwrap()
                .workers(8)
                .process(&mut buf, None)
                .unwrap();
            assert_eq!(buf.pixel(0, 0), &[9, 8, 7]);
        }
    }

    #[test]
    fn test_block_size_one_is_identity() {
        let mut single = counting_buffer(6, 6);
        let original = single.clone();
        Processor::new(1, Mode::Single)
            .unwrap()
            .process(&mut single, None)
            .unwrap();
        assert_eq!(single, original);

        let mut multi = original.clone();
        Processor::new(1, Mode::Multi)
            .unwrap()
            .workers(3)
            .process(&mut multi, None)
            .unwrap();
        assert_eq!(multi, original);
    }

    #[test]
    fn test_more_workers_than_width_matches_single_worker() {
        let mut one = counting_buffer(5, 9);
        let mut many = one.clone();
        Processor::new(2, Mode::Multi)
            .unwrap()
            .workers(1)
            .process(&mut one, None)
            .unwrap();
        Processor::new(2, Mode::Multi)
            .unwrap()
            .workers(50)
            .process(&mut many, None)
            .unwrap();
        assert_eq!(many, one);

        // The partition itself stays a valid cover with empty tails.
        let bands = column_bands(5, 50);
        assert_eq!(bands.len(), 50);
        assert!(bands.iter().skip(5).all(|b| b.is_empty()));
    }

    #[test]
    fn test_block_size_dwarfs_image() {
        let mut buf = counting_buffer(3, 2);
        Processor::new(100, Mode::Multi)
            .unwrap()
            .workers(6)
            .process(&mut buf, None)
            .unwrap();
        // (0+1+2+3+4+5) / 6 = 2 over the whole image.
        assert!(buf.as_raw().iter().all(|&v| v == 2));
    }
}
