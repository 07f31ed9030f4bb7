use bevy::prelude::*;
use crate::{
    clock::SessionClock,
    components::Health,
    enemy::Enemy,
    game::{ClassChosen, GameState, PauseToggled, PowerUpChosen, RestartRequested, RunPhase, StartWaveRequested},
    player::{CharacterClass, Player},
    progression::RewardOffer,
    waves::WaveDirector,
    weapons::{RangedTuning, Weapon},
};

const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";
const BUTTON_BG_COLOR: Color = Color::rgb(0.25, 0.22, 0.2);
const BUTTON_HOVER_BG_COLOR: Color = Color::rgb(0.2, 0.4, 0.25);
const UI_TEXT_COLOR: Color = Color::rgb(0.9, 0.9, 0.9);
const OVERLAY_COLOR: Color = Color::rgba(0.05, 0.05, 0.1, 0.85);

#[derive(Component)] struct ClassSelectUI;
#[derive(Component)] struct ClassButton(CharacterClass);
#[derive(Component)] struct RewardUI;
#[derive(Component)] struct RewardButton(usize);
#[derive(Component)] struct PauseUI;
#[derive(Component)] struct GameOverUI;
#[derive(Component)] struct InGameUI;
#[derive(Component)] struct HealthText;
#[derive(Component)] struct LevelText;
#[derive(Component)] struct ExperienceText;
#[derive(Component)] struct ScoreText;
#[derive(Component)] struct WaveText;
#[derive(Component)] struct SpecialText;

/// Screens, HUD and keyboard/button shortcuts that turn into game events.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(RunPhase::SelectingClass), (despawn_ui_by_marker::<InGameUI>, setup_class_select_ui))
            .add_systems(OnExit(RunPhase::SelectingClass), (despawn_ui_by_marker::<ClassSelectUI>, setup_ingame_ui))
            .add_systems(OnExit(RunPhase::RewardChoice), despawn_ui_by_marker::<RewardUI>)
            .add_systems(OnEnter(RunPhase::Paused), setup_pause_ui)
            .add_systems(OnExit(RunPhase::Paused), despawn_ui_by_marker::<PauseUI>)
            .add_systems(OnEnter(RunPhase::GameOver), setup_game_over_ui)
            .add_systems(OnExit(RunPhase::GameOver), despawn_ui_by_marker::<GameOverUI>)
            .add_systems(Update, (
                class_select_input_system.run_if(in_state(RunPhase::SelectingClass)),
                (refresh_reward_ui, reward_input_system).chain().run_if(in_state(RunPhase::RewardChoice)),
                combat_input_system.run_if(in_state(RunPhase::Combat)),
                pause_input_system.run_if(in_state(RunPhase::Paused)),
                game_over_input_system.run_if(in_state(RunPhase::GameOver)),
                update_ingame_ui,
                button_hover_system,
            ));
    }
}

fn despawn_ui_by_marker<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) { for entity in query.iter() { commands.entity(entity).despawn_recursive(); } }

fn text(asset_server: &AssetServer, value: impl Into<String>, font_size: f32, color: Color) -> TextBundle {
    TextBundle::from_section(value, TextStyle { font: asset_server.load(FONT_PATH), font_size, color }).with_text_justify(JustifyText::Center)
}

fn overlay_root() -> NodeBundle {
    NodeBundle {
        style: Style { width: Val::Percent(100.0), height: Val::Percent(100.0), position_type: PositionType::Absolute, justify_content: JustifyContent::Center, align_items: AlignItems::Center, flex_direction: FlexDirection::Column, row_gap: Val::Px(20.0), ..default() },
        background_color: OVERLAY_COLOR.into(),
        z_index: ZIndex::Global(10),
        ..default()
    }
}

fn card_button() -> ButtonBundle {
    ButtonBundle {
        style: Style { width: Val::Px(400.0), height: Val::Px(110.0), padding: UiRect::all(Val::Px(10.0)), justify_content: JustifyContent::Center, align_items: AlignItems::FlexStart, flex_direction: FlexDirection::Column, border: UiRect::all(Val::Px(2.0)), ..default() },
        border_color: BorderColor(Color::DARK_GRAY),
        background_color: BUTTON_BG_COLOR.into(),
        ..default()
    }
}

fn setup_class_select_ui(mut commands: Commands, asset_server: Res<AssetServer>, game_state: Res<GameState>) {
    commands.spawn((overlay_root(), ClassSelectUI)).with_children(|parent| {
        parent.spawn(text(&asset_server, "Wavebound", 70.0, Color::GOLD));
        parent.spawn(text(&asset_server, format!("High score: {}", game_state.high_score), 24.0, UI_TEXT_COLOR));
        for (index, class) in CharacterClass::ALL.iter().enumerate() {
            parent.spawn((card_button(), ClassButton(*class), Name::new(format!("Class Button {}", index + 1)))).with_children(|button| {
                button.spawn(text(&asset_server, format!("{}. {}", index + 1, class.name()), 28.0, Color::WHITE));
                button.spawn(text(&asset_server, class.blurb(), 18.0, UI_TEXT_COLOR));
            });
        }
    });
}

fn class_select_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    interaction_query: Query<(&Interaction, &ClassButton), Changed<Interaction>>,
    mut chosen: EventWriter<ClassChosen>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction == Interaction::Pressed { chosen.send(ClassChosen(button.0)); return; }
    }
    if keyboard_input.just_pressed(KeyCode::Digit1) { chosen.send(ClassChosen(CharacterClass::Gunslinger)); }
    else if keyboard_input.just_pressed(KeyCode::Digit2) { chosen.send(ClassChosen(CharacterClass::Blademaster)); }
}

/// Rebuilds the cards whenever a new set is drawn, including re-rolls for queued level-ups.
fn refresh_reward_ui(mut commands: Commands, asset_server: Res<AssetServer>, offer: Res<RewardOffer>, existing: Query<Entity, With<RewardUI>>, player_query: Query<&Player>) {
    if !offer.is_changed() && !existing.is_empty() { return; }
    for entity in existing.iter() { commands.entity(entity).despawn_recursive(); }
    if offer.choices.is_empty() { return; }
    let level = player_query.get_single().map_or(0, |player| player.experience.level);
    commands.spawn((overlay_root(), RewardUI)).with_children(|parent| {
        parent.spawn(text(&asset_server, format!("Level {level}! Choose a power-up"), 50.0, Color::GOLD));
        if offer.pending > 1 { parent.spawn(text(&asset_server, format!("{} more to choose", offer.pending - 1), 20.0, UI_TEXT_COLOR)); }
        for (index, card) in offer.choices.iter().enumerate() {
            parent.spawn((card_button(), RewardButton(index), Name::new(format!("Reward Button {}", index + 1)))).with_children(|button| {
                button.spawn(text(&asset_server, format!("{}. {}", index + 1, card.name), 24.0, Color::WHITE));
                button.spawn(text(&asset_server, card.description, 18.0, UI_TEXT_COLOR));
            });
        }
    });
}

fn reward_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    interaction_query: Query<(&Interaction, &RewardButton), Changed<Interaction>>,
    mut chosen: EventWriter<PowerUpChosen>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction == Interaction::Pressed { chosen.send(PowerUpChosen(button.0)); return; }
    }
    let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
    if let Some(index) = keys.iter().position(|key| keyboard_input.just_pressed(*key)) { chosen.send(PowerUpChosen(index)); }
}

fn button_hover_system(mut query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>) {
    for (interaction, mut bg_color) in query.iter_mut() {
        *bg_color = match *interaction { Interaction::Hovered | Interaction::Pressed => BUTTON_HOVER_BG_COLOR.into(), Interaction::None => BUTTON_BG_COLOR.into() };
    }
}

fn combat_input_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut start_wave: EventWriter<StartWaveRequested>, mut pause: EventWriter<PauseToggled>) {
    if keyboard_input.just_pressed(KeyCode::Space) { start_wave.send(StartWaveRequested); }
    if keyboard_input.just_pressed(KeyCode::Escape) { pause.send(PauseToggled); }
}

fn pause_input_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut pause: EventWriter<PauseToggled>, mut restart: EventWriter<RestartRequested>) {
    if keyboard_input.just_pressed(KeyCode::Escape) { pause.send(PauseToggled); }
    if keyboard_input.just_pressed(KeyCode::KeyR) { restart.send(RestartRequested); }
}

fn game_over_input_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut restart: EventWriter<RestartRequested>) {
    if keyboard_input.just_pressed(KeyCode::KeyR) { restart.send(RestartRequested); }
}

/// Lines of the pause screen's stats panel.
pub fn stat_lines(player: &Player, health: &Health, weapon: Option<&Weapon>, tuning: &RangedTuning) -> Vec<String> {
    let mut lines = vec![
        format!("Class: {}", player.class.map_or("None", CharacterClass::name)),
        format!("Level: {}", player.experience.level),
        format!("Health: {:.0}/{:.0}", health.current, health.max),
        format!("Speed: {:.1}", player.speed),
        format!("Life steal: {:.0}%", player.life_steal * 100.0),
        format!("Attacks per trigger: {}", player.shot_quantity),
    ];
    match weapon {
        Some(Weapon::Ranged(_)) => {
            lines.push(format!("Shot damage: {:.0}", tuning.damage));
            lines.push(format!("Pierce: {}  Bounces: {}", tuning.pierce, tuning.bounces));
        }
        Some(Weapon::Melee(sword)) => lines.push(format!("Sword damage: {:.0}  Size: {:.1}", sword.damage, sword.size)),
        None => {}
    }
    lines.push(match weapon.and_then(Weapon::attacks_per_second) {
        Some(rate) => format!("Attack rate: {rate:.2}/s"),
        None => "Attack rate: -".to_string(),
    });
    lines
}

fn setup_pause_ui(mut commands: Commands, asset_server: Res<AssetServer>, tuning: Res<RangedTuning>, player_query: Query<(&Player, &Health, Option<&Weapon>)>) {
    let lines = player_query.get_single().map(|(player, health, weapon)| stat_lines(player, health, weapon, &tuning)).unwrap_or_default();
    commands.spawn((overlay_root(), PauseUI)).with_children(|parent| {
        parent.spawn(text(&asset_server, "Paused", 60.0, Color::WHITE));
        for line in lines { parent.spawn(text(&asset_server, line, 20.0, UI_TEXT_COLOR)); }
        parent.spawn(text(&asset_server, "Resume (ESC)   Restart (R)", 28.0, Color::rgba(0.8, 0.8, 0.8, 1.0)));
    });
}

fn setup_game_over_ui(mut commands: Commands, game_state: Res<GameState>, director: Res<WaveDirector>, asset_server: Res<AssetServer>) {
    commands.spawn((overlay_root(), GameOverUI)).with_children(|parent| {
        parent.spawn(text(&asset_server, "Overrun!", 80.0, Color::RED));
        parent.spawn(text(&asset_server, format!("Score: {}   Wave: {}", game_state.score, director.wave), 40.0, Color::WHITE));
        parent.spawn(text(&asset_server, format!("High score: {}", game_state.high_score), 28.0, Color::GOLD));
        parent.spawn(text(&asset_server, "Try Again? (R)", 40.0, Color::rgba(0.8, 0.8, 0.8, 1.0)));
    });
}

fn setup_ingame_ui(mut commands: Commands, asset_server: Res<AssetServer>, existing: Query<(), With<InGameUI>>) {
    if !existing.is_empty() { return; }
    commands.spawn((
        NodeBundle { style: Style { width: Val::Percent(100.0), height: Val::Percent(100.0), flex_direction: FlexDirection::Column, justify_content: JustifyContent::SpaceBetween, padding: UiRect::all(Val::Px(10.0)), position_type: PositionType::Absolute, ..default() }, z_index: ZIndex::Global(1), ..default() },
        InGameUI,
    )).with_children(|parent| {
        parent.spawn(NodeBundle { style: Style { width: Val::Percent(100.0), justify_content: JustifyContent::SpaceAround, align_items: AlignItems::Center, padding: UiRect::all(Val::Px(5.0)), ..default() }, background_color: Color::rgba(0.0, 0.0, 0.0, 0.3).into(), ..default() }).with_children(|top_bar| {
            top_bar.spawn((text(&asset_server, "Health: --", 20.0, Color::GREEN), HealthText));
            top_bar.spawn((text(&asset_server, "Level: 1", 20.0, Color::CYAN), LevelText));
            top_bar.spawn((text(&asset_server, "Exp: 0/100", 20.0, Color::YELLOW), ExperienceText));
            top_bar.spawn((text(&asset_server, "Wave: 0", 20.0, Color::ORANGE_RED), WaveText));
        });
        parent.spawn(NodeBundle { style: Style { width: Val::Percent(100.0), justify_content: JustifyContent::SpaceBetween, align_items: AlignItems::FlexEnd, padding: UiRect::all(Val::Px(5.0)), ..default() }, ..default() }).with_children(|bottom_bar| {
            bottom_bar.spawn((text(&asset_server, "Score: 0", 20.0, Color::WHITE), ScoreText));
            bottom_bar.spawn((text(&asset_server, "Special: ready", 20.0, Color::WHITE), SpecialText));
        });
    });
}

fn update_ingame_ui(
    clock: Res<SessionClock>,
    game_state: Res<GameState>,
    director: Res<WaveDirector>,
    player_query: Query<(&Player, &Health)>,
    enemy_query: Query<(), With<Enemy>>,
    mut ui_texts: ParamSet<(
        Query<&mut Text, With<HealthText>>,
        Query<&mut Text, With<LevelText>>,
        Query<&mut Text, With<ExperienceText>>,
        Query<&mut Text, With<ScoreText>>,
        Query<&mut Text, With<WaveText>>,
        Query<&mut Text, With<SpecialText>>,
    )>,
) {
    let Ok((player, health)) = player_query.get_single() else { return };
    if let Ok(mut text) = ui_texts.p0().get_single_mut() {
        text.sections[0].value = format!("Health: {:.0}/{:.0}", health.current, health.max);
        text.sections[0].style.color = if health.ratio() < 1.0 / 3.0 { Color::RED } else if health.ratio() < 2.0 / 3.0 { Color::YELLOW } else { Color::GREEN };
    }
    if let Ok(mut text) = ui_texts.p1().get_single_mut() { text.sections[0].value = format!("Level: {}", player.experience.level); }
    if let Ok(mut text) = ui_texts.p2().get_single_mut() { text.sections[0].value = format!("Exp: {}/{}", player.experience.exp, player.experience.to_next); }
    if let Ok(mut text) = ui_texts.p3().get_single_mut() { text.sections[0].value = format!("Score: {}   Best: {}", game_state.score, game_state.high_score); }
    if let Ok(mut text) = ui_texts.p4().get_single_mut() {
        text.sections[0].value = if director.can_start(enemy_query.iter().count()) { format!("Wave: {}  (SPACE for next)", director.wave) } else { format!("Wave: {}", director.wave) };
    }
    if let Ok(mut text) = ui_texts.p5().get_single_mut() {
        let remaining = player.special_remaining_ms(clock.now());
        text.sections[0].value = if remaining == 0 { "Special: ready (RMB)".to_string() } else { format!("Special: {:.1}s", remaining as f32 / 1000.0) };
    }
}
