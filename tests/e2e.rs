mod common;

use common::synthetic_page::{blank_page, draw_box, draw_broken_line};
use omr_sticks::config::sticks::ExtensionConfig;
use omr_sticks::diagnostics::SticksReport;
use omr_sticks::image::{BinaryMask, ImageU8};
use omr_sticks::prelude::*;
use omr_sticks::SectionId;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn binarize(page: &[u8], width: usize, height: usize) -> BinaryMask {
    let view = ImageU8 {
        w: width,
        h: height,
        stride: width,
        data: page,
    };
    BinaryMask::from_gray(&view, 128)
}

#[test]
fn broken_staff_line_merges_into_one_stick() {
    init_logger();
    let (width, height) = (120usize, 24usize);
    let mut page = blank_page(width, height);
    draw_broken_line(&mut page, width, 8, 2, (0, 99), &[(30, 31), (62, 63)]);
    draw_broken_line(&mut page, width, 16, 2, (0, 99), &[]);
    let mask = binarize(&page, width, height);

    let lag = LagBuilder::new(Orientation::Horizontal, LagOptions::default())
        .build(&mask)
        .unwrap();
    assert_eq!(lag.len(), 4);

    let interline = 20;
    let mut set = StickSet::new(&lag);
    assert_eq!(set.seed_from_sections(interline, 10).unwrap(), 4);
    let tolerance = ExtensionConfig::default().to_tolerance(interline);
    let merges = set.merge_extensions(&tolerance).unwrap();
    assert_eq!(merges, 2);
    assert_eq!(set.len(), 2);

    let broken = set
        .owner_of(SectionId(0))
        .and_then(|id| set.get(id))
        .expect("first fragment is owned");
    assert_eq!(broken.start().unwrap(), 0);
    assert_eq!(broken.stop().unwrap(), 99);
    assert_eq!(broken.thickness().unwrap(), 2);
    assert_eq!(broken.weight(), 192);
    assert_eq!(broken.mid_pos().unwrap(), 9);
    assert_eq!(broken.first_stuck(), 0);
    assert_eq!(broken.last_stuck(), 0);
    assert!(broken.line().unwrap().slope().unwrap().abs() < 1e-9);
    assert!(broken.density().unwrap() < 1.0);

    let intact = set.owner_of(SectionId(3)).unwrap();
    assert_ne!(intact, broken.id());
    assert!(broken.overlap_with(set.get(intact).unwrap()).unwrap());

    let report = SticksReport::from_set(&set, merges, Some((10, 6)));
    assert_eq!(report.sticks.len(), 2);
    assert_eq!(report.sticks[0].weight, 192);
}

#[test]
fn stem_touching_a_beam_is_stuck_on_both_sides() {
    init_logger();
    let (width, height) = (50usize, 30usize);
    let mut page = blank_page(width, height);
    draw_box(&mut page, width, 10, 20, 39, 25);
    draw_box(&mut page, width, 30, 0, 31, 19);
    let mask = binarize(&page, width, height);

    let options = LagOptions {
        max_length_ratio: Some(2.0),
    };
    let lag = LagBuilder::new(Orientation::Vertical, options)
        .build(&mask)
        .unwrap();
    assert_eq!(lag.len(), 3);

    let mut set = StickSet::new(&lag);
    set.seed_from_sections(20, 10).unwrap();
    let tolerance = ExtensionConfig::default().to_tolerance(20);
    assert_eq!(set.merge_extensions(&tolerance).unwrap(), 0);

    let stem = set
        .owner_of(SectionId(1))
        .and_then(|id| set.get(id))
        .expect("stem section is owned");
    assert_eq!(stem.length().unwrap(), 26);
    assert_eq!(stem.thickness().unwrap(), 2);
    assert_eq!(stem.first_stuck(), 6);
    assert_eq!(stem.last_stuck(), 6);

    // Beam halves on each side of the stop.
    assert_eq!(stem.aliens_at_stop_first(4, 3).unwrap(), 8);
    assert_eq!(stem.aliens_at_stop_last(4, 3).unwrap(), 8);
    assert_eq!(stem.aliens_at_stop(4, 3).unwrap(), 16);
    assert_eq!(stem.aliens_at_start(4, 3).unwrap(), 0);

    let start = stem.start_point().unwrap();
    let stop = stem.stop_point().unwrap();
    assert_eq!((start.y, stop.y), (0, 25));
    assert!((30..=31).contains(&start.x));
}
