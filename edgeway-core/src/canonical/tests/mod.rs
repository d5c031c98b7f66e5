mod ambiguity_tests;
