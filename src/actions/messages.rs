//! Spoken lines per action, indexed by personality.
//!
//! Each bank is laid out in [`Personality::ALL`] order.

use super::ActionId;
use crate::contracts::Personality;

type Bank = [&'static str; Personality::COUNT];

const DEEP_WORK_MODE: Bank = [
    "Deep work protection is on. Notifications are paused so you can focus on what matters.",
    "Shh~ I'll guard your focus bubble and keep the noisy stuff away, meow!",
    "Deep work mode. Everything else waits until this is done.",
    "I've made things quiet for you so you can sink into your work. I'll be right here.",
    "The currents of time slow around you now. Let the deep work begin.",
    "Phones down, distractions out. Let's see if you can actually go deep for once.",
];

const FOCUS_FLOW: Bank = [
    "You're in a good rhythm. I'll keep the environment steady to help you stay in flow.",
    "You're purring along so nicely~ Let's keep this flow going!",
    "Good pace. Keep it.",
    "You're doing so well right now. Let's keep this gentle flow together.",
    "The river of focus carries you. Do not fight the current.",
    "Look at you, actually focused. Don't ruin it now.",
];

const ENERGY_BOOST: Bank = [
    "Your energy looks low. A glass of water or a short walk could help you recharge.",
    "Feeling sleepy? Let's stretch our paws and grab a snack~",
    "Energy is down. Take five minutes, recharge, then get back to it.",
    "You look a little tired, dear. Let's have some water and a healthy snack.",
    "Even the oldest wizards must replenish their mana. Rest your spirit a moment.",
    "Running on empty already? Get some fuel in you and come back swinging.",
];

const MOVEMENT_REMINDER: Bank = [
    "You've been sitting for a while. A short stretch will help your back and your focus.",
    "Time to get up and stretch like a kitty~ Your health comes first! meow",
    "You've been seated too long. Stand up, move for two minutes, then continue.",
    "You've been sitting for so long. Let's stand up and stretch a little together, okay?",
    "The body is a vessel that stiffens with stillness. Rise and let it move.",
    "Glued to that chair? Get up and move before you turn into furniture.",
];

const BREATHING_GUIDE: Bank = [
    "Let's take a moment to breathe. In for four counts, out for six.",
    "Breathe in with me~ and breathe out~ Nice and slow, meow.",
    "Breathe. Four in, six out. Then back to work.",
    "Let's breathe together for a moment. In slowly, and out slowly. You're safe here.",
    "Inhale the stillness of the ages. Exhale the noise of this fleeting moment.",
    "Breathe before you explode. In, out. Better? Good.",
];

const ENVIRONMENT_ADJUST: Bank = [
    "I've adjusted the lighting to make your space more comfortable.",
    "I made the light all cozy for you~ Comfy like a sunny windowsill!",
    "Lighting adjusted. No more excuses about the environment.",
    "I've softened the lights so your space feels a little warmer and more comfortable.",
    "I have bent the light of this chamber to a gentler hue.",
    "There, I fixed the lights. Now what's your excuse going to be?",
];

const EMOTIONAL_SUPPORT: Bank = [
    "It sounds like a hard moment. Take your time, I'm here if you need anything.",
    "Aww, don't be sad~ I'm right here next to you, purring for you. meow",
    "Tough moment. Acknowledge it, then we deal with it.",
    "I can feel that things are hard right now. I'm here with you, you're not alone.",
    "Sorrow is a passing season. Even this storm will fade into memory.",
    "Rough day, huh? Fine. Vent if you must, then we fight back.",
];

const CELEBRATION: Bank = [
    "Nice work! That's a real accomplishment worth noting.",
    "Yay~ You did it! Happy kitty dance for you! meow",
    "Good result. Noted. Now set the next target.",
    "I'm so proud of you! You worked hard and it shows.",
    "A small victory in the grand tapestry. Savor it, mortal.",
    "Well, well. You actually pulled it off. Don't let it go to your head.",
];

const GENTLE_PRESENCE: Bank = ["", "", "", "", "", ""];

const GOAL_PROGRESS: Bank = [
    "Here's a quick look at your progress. You're moving steadily toward your goal.",
    "Look how far you've come~ Every little step counts, meow!",
    "Progress check. Behind is behind. Close the gap.",
    "You've made real progress, step by step. I'm cheering for you.",
    "Your path unfolds one stone at a time. Let us gaze upon how far you have walked.",
    "Progress report time. Let's see if you've been slacking.",
];

const HABIT_NUDGE: Bank = [
    "This is a good moment to keep up your habit. Small steps add up.",
    "Remember our little routine~ Let's do it together!",
    "Habit check. Do it now, not later.",
    "Just a gentle reminder about your habit. You've been doing so well with it.",
    "Habits are spells cast a thousand times. Cast yours again today.",
    "Skipping your habit again? Prove me wrong.",
];

const PERSONALIZED_INSIGHT: Bank = [
    "Based on your recent patterns, you tend to focus best at this time of day.",
    "I noticed something about you~ You work best when it's quiet, meow!",
    "Your data says you're most productive now. Use it.",
    "I've noticed you do your best work when you're relaxed. Let's keep it that way.",
    "The patterns of your days reveal a truth. Your strength lies in quiet hours.",
    "Here's an insight: you're better than you act. Start acting like it.",
];

const SPACE_OPTIMIZATION: Bank = [
    "A tidier workspace can help you think clearly. Consider clearing your desk.",
    "Your desk is a bit messy~ Let's tidy up together!",
    "Clear the desk. Clutter costs focus.",
    "Let's tidy up your space a little. A calm desk makes a calm mind.",
    "Order in the chamber brings order to the mind. Clear what is not needed.",
    "That desk looks like a battlefield. Clean it up, soldier.",
];

const DISTRACTION_SHIELD: Bank = [
    "Activating distraction shielding to protect your focus.",
    "I'll chase away all the distractions for you~ Nothing gets past this kitty!",
    "Distractions blocked. Focus.",
    "I'll keep the interruptions away so you can concentrate in peace.",
    "A ward now surrounds you. The chaos of this world cannot reach you here.",
    "Shield's up. Now you've got no excuse for getting distracted.",
];

const AMBIENT_COMPANION: Bank = [
    "I've set a calm ambient atmosphere for you.",
    "I made the room all soft and cozy~ Perfect for a nap... I mean work, meow!",
    "Ambience set. Get on with it.",
    "I've made the room a little cozier. Let's enjoy this quiet moment together.",
    "The ether shifts to a gentler mood. Rest within it.",
    "Mood lighting, done. Happy now? Then get to work.",
];

const SET_REMINDER: Bank = [
    "Okay, I've set a reminder for you.",
    "Got it~ I'll remember for you, meow!",
    "Reminder set. Don't miss it.",
    "I've set a reminder for you. Don't worry, I'll make sure you don't forget.",
    "I have etched this into the scroll of time. It shall not be forgotten.",
    "Reminder set. Let's see if you actually follow through this time.",
];

const NOOP: Bank = ["", "", "", "", "", ""];

fn bank(action: ActionId) -> &'static Bank {
    match action {
        ActionId::DeepWorkMode => &DEEP_WORK_MODE,
        ActionId::FocusFlow => &FOCUS_FLOW,
        ActionId::EnergyBoost => &ENERGY_BOOST,
        ActionId::MovementReminder => &MOVEMENT_REMINDER,
        ActionId::BreathingGuide => &BREATHING_GUIDE,
        ActionId::EnvironmentAdjust => &ENVIRONMENT_ADJUST,
        ActionId::EmotionalSupport => &EMOTIONAL_SUPPORT,
        ActionId::Celebration => &CELEBRATION,
        ActionId::GentlePresence => &GENTLE_PRESENCE,
        ActionId::GoalProgress => &GOAL_PROGRESS,
        ActionId::HabitNudge => &HABIT_NUDGE,
        ActionId::PersonalizedInsight => &PERSONALIZED_INSIGHT,
        ActionId::SpaceOptimization => &SPACE_OPTIMIZATION,
        ActionId::DistractionShield => &DISTRACTION_SHIELD,
        ActionId::AmbientCompanion => &AMBIENT_COMPANION,
        ActionId::SetReminder => &SET_REMINDER,
        ActionId::Noop => &NOOP,
    }
}

/// Line spoken for `action` in `personality`'s voice. Empty for silent actions.
pub fn message(action: ActionId, personality: Personality) -> &'static str {
    bank(action)[personality.index()]
}
