//! Symbol table coverage tests.

use soulcanvas::symbols::{branch_info, stem_info, Branch, Element, Polarity, Stem, ZodiacAnimal};

#[test]
fn every_stem_has_element_polarity_and_image() {
    for stem in Stem::ALL {
        let info = stem_info(stem.glyph());
        assert!(info.element.is_some(), "{stem:?} has no element");
        assert!(info.polarity.is_some(), "{stem:?} has no polarity");
        assert!(!info.nature_image.is_empty(), "{stem:?} has no image");
    }
}

#[test]
fn stems_alternate_yang_yin_in_element_pairs() {
    let expected = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];
    for (i, stem) in Stem::ALL.iter().enumerate() {
        let info = stem.info();
        assert_eq!(info.element, Some(expected[i / 2]));
        let polarity = if i % 2 == 0 { Polarity::Yang } else { Polarity::Yin };
        assert_eq!(info.polarity, Some(polarity));
    }
}

#[test]
fn every_branch_has_element_animal_and_description() {
    for branch in Branch::ALL {
        let info = branch_info(branch.glyph());
        assert!(info.element.is_some(), "{branch:?} has no element");
        assert!(info.animal.is_some(), "{branch:?} has no animal");
        assert!(!info.description.is_empty(), "{branch:?} has no description");
    }
}

#[test]
fn stem_table_is_exact() {
    use Element::{Earth, Fire, Metal, Water, Wood};
    use Polarity::{Yang, Yin};
    let expected = [
        ('甲', Wood, Yang, "a single, massive Ancient Tree towering into the clouds, representing strength and growth"),
        ('乙', Wood, Yin, "a lush garden of winding vines, flowers, and soft grass, representing flexibility and grace"),
        ('丙', Fire, Yang, "the brilliant Sun shining high in the sky, illuminating a vast landscape"),
        ('丁', Fire, Yin, "a mystical starlight night or a warm lantern glow in the darkness"),
        ('戊', Earth, Yang, "a majestic, immovable Mountain peak touching the sky"),
        ('己', Earth, Yin, "fertile soil, a flat plain or a nurtured garden bed"),
        ('庚', Metal, Yang, "massive raw iron rocks, sharp cliffs, or a metallic weapon forged by nature"),
        ('辛', Metal, Yin, "glittering gemstones embedded in rock, frost on leaves, or fine precious metal"),
        ('壬', Water, Yang, "a wide, powerful rushing river or the deep ocean"),
        ('癸', Water, Yin, "morning mist, dew drops on leaves, or a gentle rain shower"),
    ];
    assert_eq!(expected.len(), Stem::ALL.len());
    for (stem, (glyph, element, polarity, image)) in Stem::ALL.iter().zip(expected) {
        assert_eq!(stem.glyph(), glyph);
        let info = stem_info(glyph);
        assert_eq!(info.element, Some(element), "{glyph}");
        assert_eq!(info.polarity, Some(polarity), "{glyph}");
        assert_eq!(info.nature_image, image, "{glyph}");
    }
}

#[test]
fn branch_table_is_exact() {
    use Element::{Earth, Fire, Metal, Water, Wood};
    use ZodiacAnimal::*;
    let expected = [
        ('子', Water, Rat, "Midnight, cold water"),
        ('丑', Earth, Ox, "Frozen earth, icy tundra"),
        ('寅', Wood, Tiger, "Early spring forest"),
        ('卯', Wood, Rabbit, "Lush flowering grass"),
        ('辰', Earth, Dragon, "Wet swampy earth, reservoir"),
        ('巳', Fire, Snake, "Early summer heat"),
        ('午', Fire, Horse, "Peak noon fire"),
        ('未', Earth, Goat, "Hot dry earth, desert"),
        ('申', Metal, Monkey, "Hard metal ore"),
        ('酉', Metal, Rooster, "Refined jewelry metal"),
        ('戌', Earth, Dog, "Dry volcanic earth, sunset"),
        ('亥', Water, Pig, "Deep lake water"),
    ];
    assert_eq!(expected.len(), Branch::ALL.len());
    for (branch, (glyph, element, animal, description)) in Branch::ALL.iter().zip(expected) {
        assert_eq!(branch.glyph(), glyph);
        let info = branch_info(glyph);
        assert_eq!(info.element, Some(element), "{glyph}");
        assert_eq!(info.animal, Some(animal), "{glyph}");
        assert_eq!(info.description, description, "{glyph}");
    }
}

#[test]
fn branch_spot_checks() {
    let zi = branch_info('子');
    assert_eq!(zi.element, Some(Element::Water));
    assert_eq!(zi.animal, Some(ZodiacAnimal::Rat));

    let chen = branch_info('辰');
    assert_eq!(chen.element, Some(Element::Earth));
    assert_eq!(chen.animal, Some(ZodiacAnimal::Dragon));

    let you = branch_info('酉');
    assert_eq!(you.element, Some(Element::Metal));
    assert_eq!(you.animal, Some(ZodiacAnimal::Rooster));
}

#[test]
fn unknown_glyphs_resolve_to_sentinel() {
    let stem = stem_info('X');
    assert_eq!(stem.element, None);
    assert_eq!(stem.polarity_name(), "");
    assert!(stem.nature_image.is_empty());

    let branch = branch_info('?');
    assert_eq!(branch.element, None);
    assert_eq!(branch.animal, None);
}
